use glam::Vec2;
use vitrine_engine::text::{FontId, FontSystem};

/// Text extents in world units, used for label hit areas.
pub trait MeasureText {
    /// Width and line height of `text` set at `size` world units.
    fn measure(&self, text: &str, size: f32) -> Vec2;
}

/// Measures with one font from a [`FontSystem`].
pub struct FontMeasure<'a> {
    pub fonts: &'a FontSystem,
    pub font: FontId,
}

impl MeasureText for FontMeasure<'_> {
    fn measure(&self, text: &str, size: f32) -> Vec2 {
        self.fonts.measure_text(text, self.font, size)
    }
}

/// Fixed advance per character; for headless use and tests.
#[derive(Debug, Copy, Clone)]
pub struct MonospaceMeasure {
    /// Advance per character as a fraction of the size.
    pub advance: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl MeasureText for MonospaceMeasure {
    fn measure(&self, text: &str, size: f32) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.advance * size, size * 1.2)
    }
}
