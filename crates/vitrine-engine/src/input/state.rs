use std::collections::HashSet;

use glam::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent};

/// Current input state for the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Last known pointer position; survives `PointerLeft` so the glass
    /// mesh keeps its place when the cursor leaves the window.
    pub last_pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((*x, *y));
                self.last_pointer_pos = self.pointer_pos;
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y }) => {
                self.pointer_pos = Some((*x, *y));
                self.last_pointer_pos = self.pointer_pos;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel(_) => {}
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Pointer mapped to −1..1 on both axes with +Y up.
    ///
    /// Falls back to the last known position, then to the window center.
    pub fn pointer_ndc(&self, window_size: (f32, f32)) -> Vec2 {
        let (w, h) = window_size;
        let Some((x, y)) = self.pointer_pos.or(self.last_pointer_pos) else {
            return Vec2::ZERO;
        };
        if w <= 0.0 || h <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (x / w * 2.0 - 1.0).clamp(-1.0, 1.0),
            (1.0 - y / h * 2.0).clamp(-1.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button, state, x: 10.0, y: 10.0 })
    }

    #[test]
    fn click_records_press_and_release() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, press(MouseButton::Left, MouseButtonState::Pressed));
        s.apply_event(&mut f, press(MouseButton::Left, MouseButtonState::Released));
        assert!(f.clicked());
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });
        assert!(s.key_down(Key::Space));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(!s.key_down(Key::Space));
    }

    #[test]
    fn pointer_ndc_maps_corners_and_remembers_last_position() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        assert_eq!(s.pointer_ndc((800.0, 600.0)), Vec2::ZERO);

        s.apply_event(&mut f, InputEvent::PointerMoved { x: 800.0, y: 0.0 });
        assert_eq!(s.pointer_ndc((800.0, 600.0)), Vec2::new(1.0, 1.0));

        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer_ndc((800.0, 600.0)), Vec2::new(1.0, 1.0));
    }
}
