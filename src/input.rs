//! Keyboard command decoding
//!
//! Key presses are decoded into [`SceneCommand`] values, which
//! [`SceneState::apply`](crate::gfx::scene::SceneState::apply) executes. Keeping
//! the two steps apart means scene behaviour can be driven without a window.

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Every action a key press can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Terminate,
    RotateLeft,
    RotateRight,
    ViewX,
    ViewY,
    ViewZ,
    ProjectionOrthographic,
    ProjectionPerspective,
    ToggleInstancing,
    Step,
    StartContinuous,
}

impl SceneCommand {
    /// Maps a physical key to its command. Unbound keys yield `None`.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let command = match key {
            KeyCode::Escape => SceneCommand::Terminate,
            KeyCode::ArrowLeft => SceneCommand::RotateLeft,
            KeyCode::ArrowRight => SceneCommand::RotateRight,
            KeyCode::KeyX => SceneCommand::ViewX,
            KeyCode::KeyY => SceneCommand::ViewY,
            KeyCode::KeyZ => SceneCommand::ViewZ,
            KeyCode::KeyO => SceneCommand::ProjectionOrthographic,
            KeyCode::KeyP => SceneCommand::ProjectionPerspective,
            KeyCode::KeyI => SceneCommand::ToggleInstancing,
            KeyCode::KeyS => SceneCommand::Step,
            KeyCode::KeyC => SceneCommand::StartContinuous,
            _ => return None,
        };
        Some(command)
    }

    /// Decodes a winit key event. Only fresh presses count; releases and
    /// auto-repeat are ignored.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(code),
                state: ElementState::Pressed,
                repeat: false,
                ..
            } => Self::from_key(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_keys() {
        let bindings = [
            (KeyCode::Escape, SceneCommand::Terminate),
            (KeyCode::ArrowLeft, SceneCommand::RotateLeft),
            (KeyCode::ArrowRight, SceneCommand::RotateRight),
            (KeyCode::KeyX, SceneCommand::ViewX),
            (KeyCode::KeyY, SceneCommand::ViewY),
            (KeyCode::KeyZ, SceneCommand::ViewZ),
            (KeyCode::KeyO, SceneCommand::ProjectionOrthographic),
            (KeyCode::KeyP, SceneCommand::ProjectionPerspective),
            (KeyCode::KeyI, SceneCommand::ToggleInstancing),
            (KeyCode::KeyS, SceneCommand::Step),
            (KeyCode::KeyC, SceneCommand::StartContinuous),
        ];
        for (key, command) in bindings {
            assert_eq!(SceneCommand::from_key(key), Some(command));
        }
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        for key in [KeyCode::KeyA, KeyCode::Space, KeyCode::ArrowUp, KeyCode::Enter] {
            assert_eq!(SceneCommand::from_key(key), None);
        }
    }
}
