//! Page title that fades out over the first quarter of the scroll.

use glam::Vec3;
use vitrine_engine::paint::Color;
use vitrine_engine::scene::{DrawList, TextCmd};
use vitrine_engine::text::FontId;

use crate::frame::FrameInput;

pub const TITLE_DEPTH: f32 = 12.0;
/// Opacity lost per unit of scroll offset.
pub const FADE_RATE: f32 = 4.0;

/// `1` at the top of the page, `0` from a quarter of the way down.
pub fn opacity(offset: f32) -> f32 {
    (1.0 - FADE_RATE * offset).clamp(0.0, 1.0)
}

/// Title placement and fade for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleState {
    pub opacity: f32,
    pub visible: bool,
    pub font_size: f32,
    /// World position, including the scroll group offset.
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct Title {
    text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placement and fade for this tick. A selected image's backdrop hides the
    /// title outright: text paints over every quad, so it cannot be dimmed by
    /// depth alone.
    pub fn state(&self, input: &FrameInput, image_selected: bool) -> TitleState {
        let opacity = if image_selected { 0.0 } else { opacity(input.scroll.offset) };
        let group_offset = input.scroll.group_offset(input.viewport.height);
        TitleState {
            opacity,
            visible: opacity > 0.0,
            font_size: input.breakpoint.title_font_size(),
            position: Vec3::new(0.0, group_offset, TITLE_DEPTH),
        }
    }

    /// Records the title if `state` is visible and the text non-empty.
    pub fn emit(&self, state: &TitleState, font: FontId, list: &mut DrawList) {
        if !state.visible || self.text.is_empty() {
            return;
        }
        list.push_text(TextCmd {
            text: self.text.clone(),
            font,
            size: state.font_size,
            color: Color::WHITE.faded(state.opacity),
            anchor: state.position,
        });
    }
}
