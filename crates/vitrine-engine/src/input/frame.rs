use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton, MouseWheelDelta};

/// Logical pixels scrolled per wheel notch.
pub const LINE_HEIGHT_PX: f32 = 48.0;

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down and where the pointer is;
/// `InputFrame` holds what changed since the last presented frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Vertical wheel travel this frame in logical pixels.
    ///
    /// Positive values reveal content further down the page.
    pub scroll_delta: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.scroll_delta = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        if let InputEvent::MouseWheel(delta) = &ev {
            // Wheel "up" (positive y) scrolls toward the top of the page.
            self.scroll_delta -= match *delta {
                MouseWheelDelta::Line { y, .. } => y * LINE_HEIGHT_PX,
                MouseWheelDelta::Pixel { y, .. } => y,
            };
        }
        self.events.push(ev);
    }

    /// True when the left button was released this frame (a click).
    pub fn clicked(&self) -> bool {
        self.buttons_released.contains(&MouseButton::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_deltas_accumulate_and_clear() {
        let mut f = InputFrame::default();
        f.push_event(InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: -1.0 }));
        f.push_event(InputEvent::MouseWheel(MouseWheelDelta::Pixel { x: 0.0, y: -12.0 }));
        assert_eq!(f.scroll_delta, LINE_HEIGHT_PX + 12.0);
        f.clear();
        assert_eq!(f.scroll_delta, 0.0);
        assert!(f.events.is_empty());
    }
}
