//! Pointer and keyboard events delivered to the interaction controller.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
    /// The pointer left the view; ends any drag like a release.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => Some(*position),
            PointerEvent::Leave => None,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed { key: String, modifiers: Modifiers },
    Released { key: String },
}

impl KeyEvent {
    pub fn pressed(key: impl Into<String>) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pressed_with(key: impl Into<String>, modifiers: Modifiers) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let down = PointerEvent::Down {
            position: Point::new(1.0, 2.0),
            button: MouseButton::Left,
        };
        assert_eq!(down.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers::NONE.command());
    }
}
