/// Visible extent of the scene at some depth, in world units.
///
/// This is what the layout code means by "the viewport": at depth `z` the
/// camera frustum is `width × height` world units wide, centered on the axis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height; 1.0 for a degenerate viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    /// Scales both axes by `f` (e.g. `0.8` for the 80% selection clamp).
    #[inline]
    pub fn scaled(self, f: f32) -> Self {
        Self::new(self.width * f, self.height * f)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
