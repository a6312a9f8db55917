//! Normalized input-event data and dispatch primitives.

use crate::view::ViewId;
use serde::{Deserialize, Serialize};

/// Logical direction of a caret movement or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

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
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// The platform "primary" shortcut modifier (Ctrl or Cmd).
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Normalized key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Delete,
    Backspace,
    Char(char),
}

/// A key press, as delivered by the host input observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDownEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyDownEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn is_arrow(&self) -> bool {
        matches!(
            self.key,
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown
        )
    }

    /// Arrow direction in an LTR document; `None` for non-arrow keys.
    pub fn arrow_direction(&self) -> Option<Direction> {
        match self.key {
            Key::ArrowRight | Key::ArrowDown => Some(Direction::Forward),
            Key::ArrowLeft | Key::ArrowUp => Some(Direction::Backward),
            _ => None,
        }
    }

    /// The select-all combination (Ctrl/Cmd+A).
    pub fn is_select_all(&self) -> bool {
        self.modifiers.primary() && matches!(self.key, Key::Char('a') | Key::Char('A'))
    }
}

/// A pointer press on a view node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerDownEvent {
    pub target: ViewId,
    pub button: MouseButton,
}

impl PointerDownEvent {
    pub fn left(target: ViewId) -> Self {
        Self {
            target,
            button: MouseButton::Left,
        }
    }
}

/// A delete request (Delete / Backspace after host normalization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEvent {
    pub direction: Direction,
}

/// Handler dispatch tiers. Handlers run high to low; a stopped event does
/// not reach lower tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Normal,
    Low,
}

/// Per-dispatch event state: the only cancellation mechanism.
#[derive(Debug, Clone, Default)]
pub struct EventInfo {
    stopped: bool,
    default_prevented: bool,
}

impl EventInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop propagation to lower-priority handlers.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Suppress the default platform behavior.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_direction() {
        assert_eq!(
            KeyDownEvent::plain(Key::ArrowRight).arrow_direction(),
            Some(Direction::Forward)
        );
        assert_eq!(
            KeyDownEvent::plain(Key::ArrowUp).arrow_direction(),
            Some(Direction::Backward)
        );
        assert_eq!(KeyDownEvent::plain(Key::Enter).arrow_direction(), None);
    }

    #[test]
    fn test_select_all_combination() {
        let ctrl_a = KeyDownEvent::new(
            Key::Char('a'),
            Modifiers {
                ctrl: true,
                ..Default::default()
            },
        );
        let cmd_a = KeyDownEvent::new(
            Key::Char('a'),
            Modifiers {
                meta: true,
                ..Default::default()
            },
        );
        assert!(ctrl_a.is_select_all());
        assert!(cmd_a.is_select_all());
        assert!(!KeyDownEvent::plain(Key::Char('a')).is_select_all());
    }

    #[test]
    fn test_event_info_stop() {
        let mut info = EventInfo::new();
        assert!(!info.is_stopped());
        info.stop();
        info.prevent_default();
        assert!(info.is_stopped());
        assert!(info.is_default_prevented());
    }
}
