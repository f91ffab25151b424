//! Page scroll tracking.
//!
//! The page is `pages` viewport heights tall. Wheel and keyboard input move a
//! target offset in `0..=1`; the visible offset eases toward it every tick.

use vitrine_engine::input::{Key, LINE_HEIGHT_PX};

use crate::damp::Damped;

/// Viewport height assumed until the first real one is reported.
const DEFAULT_VIEWPORT_PX: f32 = 720.0;

/// Scroll position for one tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollState {
    /// Normalized offset, 0 at the top of the page and 1 at the bottom.
    pub offset: f32,
    pub pages: f32,
}

impl ScrollState {
    pub fn new(offset: f32, pages: f32) -> Self {
        Self { offset: offset.clamp(0.0, 1.0), pages }
    }

    /// Vertical translation of the scroll group for a viewport `height` in
    /// world units.
    pub fn group_offset(&self, height: f32) -> f32 {
        self.offset * (self.pages - 1.0).max(0.0) * height
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollTracker {
    pages: f32,
    target: f32,
    visible: Damped<f32>,
    damping: f32,
    viewport_px: f32,
}

impl ScrollTracker {
    /// `pages` below 1 are treated as 1 (nothing to scroll).
    pub fn new(pages: f32, damping: f32) -> Self {
        Self {
            pages: pages.max(1.0),
            target: 0.0,
            visible: Damped::new(0.0),
            damping,
            viewport_px: DEFAULT_VIEWPORT_PX,
        }
    }

    #[inline]
    pub fn pages(&self) -> f32 {
        self.pages
    }

    /// Offset the visible position is easing toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Height of the window in logical pixels; sets how far pixel deltas move.
    pub fn set_viewport_height(&mut self, px: f32) {
        if px > 0.0 {
            self.viewport_px = px;
        }
    }

    fn scrollable_px(&self) -> f32 {
        (self.pages - 1.0) * self.viewport_px
    }

    fn nudge_px(&mut self, delta_px: f32) {
        let span = self.scrollable_px();
        if span <= 0.0 {
            return;
        }
        self.scroll_to_fraction(self.target + delta_px / span);
    }

    /// Positive `delta_px` scrolls down the page.
    pub fn apply_wheel(&mut self, delta_px: f32, viewport_px_height: f32) {
        self.set_viewport_height(viewport_px_height);
        self.nudge_px(delta_px);
    }

    /// Handles scroll keys. Returns `false` for keys it ignores.
    pub fn apply_key(&mut self, key: Key) -> bool {
        match key {
            Key::ArrowDown => self.nudge_px(LINE_HEIGHT_PX),
            Key::ArrowUp => self.nudge_px(-LINE_HEIGHT_PX),
            Key::PageDown | Key::Space => self.nudge_px(self.viewport_px),
            Key::PageUp => self.nudge_px(-self.viewport_px),
            Key::Home => self.scroll_to_fraction(0.0),
            Key::End => self.scroll_to_fraction(1.0),
            _ => return false,
        }
        true
    }

    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        if fraction.is_finite() {
            self.target = fraction.clamp(0.0, 1.0);
        }
    }

    /// Eases the visible offset toward the target.
    pub fn tick(&mut self, dt: f32) -> ScrollState {
        let offset = self.visible.update(self.target, self.damping, dt).clamp(0.0, 1.0);
        ScrollState::new(offset, self.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── group offset ──────────────────────────────────────────────────────

    #[test]
    fn group_offset_spans_extra_pages() {
        let s = ScrollState::new(1.0, 3.0);
        assert_eq!(s.group_offset(2.0), 4.0);
        assert_eq!(ScrollState::new(0.5, 1.0).group_offset(2.0), 0.0);
    }

    // ── input ─────────────────────────────────────────────────────────────

    #[test]
    fn wheel_moves_target_and_clamps() {
        let mut t = ScrollTracker::new(3.0, 0.2);
        t.apply_wheel(720.0, 720.0);
        assert!((t.target() - 0.5).abs() < 1e-6);
        t.apply_wheel(10_000.0, 720.0);
        assert_eq!(t.target(), 1.0);
        t.apply_wheel(-10_000.0, 720.0);
        assert_eq!(t.target(), 0.0);
    }

    #[test]
    fn single_page_never_scrolls() {
        let mut t = ScrollTracker::new(1.0, 0.2);
        t.apply_wheel(500.0, 720.0);
        assert!(t.apply_key(Key::End));
        // End is absolute; wheel is relative and has nowhere to go.
        assert_eq!(t.target(), 1.0);
        let mut t = ScrollTracker::new(1.0, 0.2);
        t.apply_wheel(500.0, 720.0);
        assert_eq!(t.target(), 0.0);
    }

    #[test]
    fn keys_page_and_jump() {
        let mut t = ScrollTracker::new(3.0, 0.2);
        t.set_viewport_height(600.0);
        assert!(t.apply_key(Key::PageDown));
        assert!((t.target() - 0.5).abs() < 1e-6);
        assert!(t.apply_key(Key::End));
        assert_eq!(t.target(), 1.0);
        assert!(t.apply_key(Key::Home));
        assert_eq!(t.target(), 0.0);
        assert!(!t.apply_key(Key::Enter));
    }

    // ── easing ────────────────────────────────────────────────────────────

    #[test]
    fn visible_offset_eases_toward_target() {
        let mut t = ScrollTracker::new(3.0, 0.2);
        t.scroll_to_fraction(1.0);
        let first = t.tick(1.0 / 60.0).offset;
        assert!(first > 0.0 && first < 1.0);
        let mut last = first;
        for _ in 0..300 {
            last = t.tick(1.0 / 60.0).offset;
        }
        assert!((last - 1.0).abs() < 1e-3);
    }
}
