use glam::{Vec2, Vec3};

use crate::paint::Color;
use crate::render::TextureId;
use crate::text::FontId;

/// Axis-aligned quad facing the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCmd {
    pub center: Vec3,
    /// World-space width and height.
    pub size: Vec2,
    /// `None` draws a solid quad in `color`.
    pub texture: Option<TextureId>,
    /// Multiplied with the texture sample (premultiplied).
    pub color: Color,
}

/// Single-line text centered on `anchor`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Cap height scale in world units.
    pub size: f32,
    pub color: Color,
    pub anchor: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Quad(QuadCmd),
    Text(TextCmd),
}

impl DrawCmd {
    /// Depth used for back-to-front ordering.
    #[inline]
    pub fn depth(&self) -> f32 {
        match self {
            DrawCmd::Quad(q) => q.center.z,
            DrawCmd::Text(t) => t.anchor.z,
        }
    }
}
