//! Input state management
//!
//! Double-buffered snapshot of held actions and mouse buttons. The game
//! loop samples macroquad once per frame and feeds the sample in with
//! `begin_frame`; everything after that is plain data, so game updates
//! can be driven without a window.

use macroquad::prelude::{is_key_down, is_mouse_button_down, mouse_position, MouseButton};
use crate::camera::{CameraInput, MoveKeys};
use crate::math::Vec2;
use super::{Action, ActionSet, KeyBindings};

/// Mouse buttons tracked by the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl Button {
    /// Snapshot order
    pub const ALL: [Button; 3] = [Button::Left, Button::Right, Button::Middle];
}

impl From<Button> for MouseButton {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => MouseButton::Left,
            Button::Right => MouseButton::Right,
            Button::Middle => MouseButton::Middle,
        }
    }
}

/// Raw input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    pub actions: ActionSet,
    pub buttons: [bool; 3],
    pub mouse: Vec2,
}

impl InputSample {
    /// Read the live keyboard and mouse through macroquad
    pub fn poll(bindings: &KeyBindings) -> Self {
        let actions = bindings
            .resolved()
            .into_iter()
            .filter(|(_, key)| is_key_down(*key))
            .map(|(action, _)| action)
            .collect();
        let (mx, my) = mouse_position();
        Self {
            actions,
            buttons: Button::ALL.map(|b| is_mouse_button_down(b.into())),
            mouse: Vec2::new(mx, my),
        }
    }
}

/// Current and previous frame input
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: InputSample,
    previous: InputSample,
    started: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift current into previous and record a new sample.
    /// On the first frame previous mirrors the sample, so nothing
    /// registers as a fresh press and the mouse delta is zero.
    pub fn begin_frame(&mut self, sample: InputSample) {
        self.previous = if self.started { self.current } else { sample };
        self.current = sample;
        self.started = true;
    }

    /// Is the action held this frame?
    pub fn action_down(&self, action: Action) -> bool {
        self.current.actions.contains(action)
    }

    /// Did the action go down this frame?
    pub fn action_pressed(&self, action: Action) -> bool {
        self.current.actions.contains(action) && !self.previous.actions.contains(action)
    }

    pub fn mouse_down(&self, button: Button) -> bool {
        self.current.buttons[button as usize]
    }

    /// Did the button go down this frame?
    pub fn mouse_pressed(&self, button: Button) -> bool {
        self.mouse_down(button) && !self.previous.buttons[button as usize]
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.current.mouse
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_position() - self.previous.mouse
    }

    /// Movement keys and mouse delta for the first-person camera
    pub fn camera_input(&self) -> CameraInput {
        CameraInput {
            moves: MoveKeys {
                front: self.action_down(Action::MoveFront),
                back: self.action_down(Action::MoveBack),
                right: self.action_down(Action::MoveRight),
                left: self.action_down(Action::MoveLeft),
                up: self.action_down(Action::MoveUp),
                down: self.action_down(Action::MoveDown),
            },
            mouse_delta: self.mouse_delta(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(actions: &[Action], mouse: (f32, f32)) -> InputSample {
        InputSample {
            actions: actions.iter().copied().collect(),
            buttons: [false; 3],
            mouse: Vec2::new(mouse.0, mouse.1),
        }
    }

    #[test]
    fn test_pressed_is_edge_triggered() {
        let mut input = InputState::new();
        input.begin_frame(sample(&[], (0.0, 0.0)));
        input.begin_frame(sample(&[Action::ReportCell], (0.0, 0.0)));
        assert!(input.action_pressed(Action::ReportCell));
        assert!(input.action_down(Action::ReportCell));

        input.begin_frame(sample(&[Action::ReportCell], (0.0, 0.0)));
        assert!(!input.action_pressed(Action::ReportCell));
        assert!(input.action_down(Action::ReportCell));

        input.begin_frame(sample(&[], (0.0, 0.0)));
        assert!(!input.action_down(Action::ReportCell));
    }

    #[test]
    fn test_first_frame_has_no_edges_or_delta() {
        let mut input = InputState::new();
        input.begin_frame(sample(&[Action::Quit], (400.0, 225.0)));
        assert!(!input.action_pressed(Action::Quit));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_mouse_delta_and_buttons() {
        let mut input = InputState::new();
        input.begin_frame(sample(&[], (10.0, 10.0)));
        let mut s = sample(&[], (13.0, 6.0));
        s.buttons[Button::Middle as usize] = true;
        input.begin_frame(s);
        assert_eq!(input.mouse_delta(), Vec2::new(3.0, -4.0));
        assert_eq!(input.mouse_position(), Vec2::new(13.0, 6.0));
        assert!(input.mouse_down(Button::Middle));
        assert!(input.mouse_pressed(Button::Middle));
        assert!(!input.mouse_down(Button::Left));

        input.begin_frame(s);
        assert!(input.mouse_down(Button::Middle));
        assert!(!input.mouse_pressed(Button::Middle));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_button_order_matches_snapshot() {
        for (i, b) in Button::ALL.into_iter().enumerate() {
            assert_eq!(b as usize, i);
        }
        assert_eq!(MouseButton::from(Button::Right), MouseButton::Right);
    }

    #[test]
    fn test_camera_input_maps_moves() {
        let mut input = InputState::new();
        input.begin_frame(sample(&[Action::MoveFront, Action::MoveLeft, Action::MoveDown], (0.0, 0.0)));
        let cam = input.camera_input();
        assert!(cam.moves.front && cam.moves.left && cam.moves.down);
        assert!(!cam.moves.back && !cam.moves.right && !cam.moves.up);
    }
}
