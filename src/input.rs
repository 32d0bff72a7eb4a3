//! Keyboard input
//!
//! One snapshot of the bound keys per frame, plus the previous frame's
//! snapshot for edge-triggered presses (jump, camera turns, menu advance).

use macroquad::prelude::{is_key_down, KeyCode};

const ACTION_COUNT: usize = 8;

/// Everything the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Forward,
    Back,
    Jump,
    CameraLeft,
    CameraRight,
    Exit,
}

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Left,
        Action::Right,
        Action::Forward,
        Action::Back,
        Action::Jump,
        Action::CameraLeft,
        Action::CameraRight,
        Action::Exit,
    ];

    pub fn key(self) -> KeyCode {
        match self {
            Action::Left => KeyCode::Left,
            Action::Right => KeyCode::Right,
            Action::Forward => KeyCode::Up,
            Action::Back => KeyCode::Down,
            Action::Jump => KeyCode::Z,
            Action::CameraLeft => KeyCode::X,
            Action::CameraRight => KeyCode::C,
            Action::Exit => KeyCode::Escape,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: [bool; ACTION_COUNT],
    previous: [bool; ACTION_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift the current snapshot to previous and take a new one
    pub fn update_with(&mut self, mut down: impl FnMut(Action) -> bool) {
        self.previous = self.current;
        for action in Action::ALL {
            self.current[action.index()] = down(action);
        }
    }

    /// Read the keyboard
    pub fn poll(&mut self) {
        self.update_with(|action| is_key_down(action.key()));
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.current[action.index()]
    }

    /// Down this frame but not the last
    pub fn is_pressed(&self, action: Action) -> bool {
        self.current[action.index()] && !self.previous[action.index()]
    }

    /// Directional input as (right - left, forward - back)
    pub fn movement(&self) -> (f32, f32) {
        let axis = |pos: Action, neg: Action| self.is_down(pos) as i32 as f32 - self.is_down(neg) as i32 as f32;
        (axis(Action::Right, Action::Left), axis(Action::Forward, Action::Back))
    }
}
