//! Input handling: flight controls and mouse state for camera orbit.

use glam::Vec2;

/// Flight control signals. The set is closed; `Controls` is indexed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Control {
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    YawLeft,
    YawRight,
    ThrottleUp,
    ThrottleDown,
}

impl Control {
    /// Number of controls.
    pub const COUNT: usize = 8;

    /// All controls in index order.
    pub const ALL: [Control; Control::COUNT] = [
        Control::PitchUp,
        Control::PitchDown,
        Control::RollLeft,
        Control::RollRight,
        Control::YawLeft,
        Control::YawRight,
        Control::ThrottleUp,
        Control::ThrottleDown,
    ];

    /// The key bound to this control.
    pub fn key(self) -> KeyCode {
        match self {
            Control::PitchUp => KeyCode::KeyS,
            Control::PitchDown => KeyCode::KeyW,
            Control::RollLeft => KeyCode::KeyA,
            Control::RollRight => KeyCode::KeyD,
            Control::YawLeft => KeyCode::KeyQ,
            Control::YawRight => KeyCode::KeyE,
            Control::ThrottleUp => KeyCode::ShiftLeft,
            Control::ThrottleDown => KeyCode::Space,
        }
    }
}

/// Fixed-size boolean control state, indexed by [`Control`].
///
/// Written from raw key events with "pressed or held" semantics; the
/// flight update reads it each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls([bool; Control::COUNT]);

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a control is currently active.
    pub fn is_active(&self, control: Control) -> bool {
        self.0[control as usize]
    }

    /// Set a control directly (used by tests and replay).
    pub fn set(&mut self, control: Control, active: bool) {
        self.0[control as usize] = active;
    }

    /// Signed signal from an opposing pair: +1, 0 or -1.
    ///
    /// Both directions held cancels to exactly 0.
    pub fn signal(&self, positive: Control, negative: Control) -> f32 {
        (self.is_active(positive) as i8 - self.is_active(negative) as i8) as f32
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Flight control state (pressed or held).
    controls: Controls,

    /// Left mouse button held (orbit drag active).
    mouse_button_pressed: bool,
    /// Cursor position where the current drag started.
    mouse_press_start: Vec2,
    /// Latest cursor position.
    mouse_position: Vec2,
    /// Scroll wheel movement this frame (lines).
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.scroll_delta = 0.0;
    }

    /// Process a keyboard event. Flight controls track press-or-held state;
    /// everything else is the caller's business.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        let active = state.is_pressed();
        for control in Control::ALL {
            if control.key() == key {
                self.controls.set(control, active);
            }
        }
    }

    /// Process a mouse button event. Returns true if an orbit drag just started.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        if button == MouseButton::Left {
            self.mouse_button_pressed = state.is_pressed();
            if self.mouse_button_pressed {
                self.mouse_press_start = self.mouse_position;
                return true;
            }
        }
        false
    }

    /// Process a cursor move. While the left button is held, returns the
    /// drag delta since the last move and re-anchors the drag start.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) -> Option<Vec2> {
        self.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
        if self.mouse_button_pressed {
            let delta = self.mouse_press_start - self.mouse_position;
            self.mouse_press_start = self.mouse_position;
            Some(delta)
        } else {
            None
        }
    }

    /// Accumulate scroll wheel movement.
    pub fn process_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Current flight control state.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Scroll wheel movement this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_pairs_cancel_to_zero() {
        let mut c = Controls::new();
        let pairs = [
            (Control::ThrottleUp, Control::ThrottleDown),
            (Control::YawLeft, Control::YawRight),
            (Control::PitchDown, Control::PitchUp),
            (Control::RollRight, Control::RollLeft),
        ];
        for (pos, neg) in pairs {
            c.set(pos, true);
            c.set(neg, true);
            assert_eq!(c.signal(pos, neg), 0.0);
            c.set(neg, false);
            assert_eq!(c.signal(pos, neg), 1.0);
            c.set(pos, false);
            c.set(neg, true);
            assert_eq!(c.signal(pos, neg), -1.0);
            c.set(neg, false);
        }
    }

    #[test]
    fn key_release_clears_control() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        assert!(input.controls().is_active(Control::ThrottleUp));
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Released);
        assert!(!input.controls().is_active(Control::ThrottleUp));
    }

    #[test]
    fn drag_delta_only_while_button_held() {
        let mut input = InputState::new();
        assert_eq!(input.process_cursor_position((10.0, 10.0)), None);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        let delta = input.process_cursor_position((4.0, 7.0)).unwrap();
        assert_eq!(delta, Vec2::new(6.0, 3.0));
        // drag re-anchors: a second identical position yields zero delta
        let delta = input.process_cursor_position((4.0, 7.0)).unwrap();
        assert_eq!(delta, Vec2::ZERO);
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(input.process_cursor_position((0.0, 0.0)), None);
    }

    #[test]
    fn scroll_accumulates_until_frame_start() {
        let mut input = InputState::new();
        input.process_scroll(1.0);
        input.process_scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.begin_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
