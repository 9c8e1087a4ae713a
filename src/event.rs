//! Raw key events handed from the hook to the dispatch worker.

use crate::key::KeyCode;

/// The kind of key state change.
///
/// The `Sys` variants are what the OS reports for transitions that happen
/// while Alt is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
    SysDown,
    SysUp,
}

impl KeyTransition {
    pub fn is_down(self) -> bool {
        matches!(self, KeyTransition::Down | KeyTransition::SysDown)
    }

    pub fn is_up(self) -> bool {
        matches!(self, KeyTransition::Up | KeyTransition::SysUp)
    }
}

/// A single keyboard event observed by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub transition: KeyTransition,
}

impl KeyEvent {
    pub fn new(key: KeyCode, transition: KeyTransition) -> Self {
        Self { key, transition }
    }

    pub fn down(key: KeyCode) -> Self {
        Self::new(key, KeyTransition::Down)
    }

    pub fn up(key: KeyCode) -> Self {
        Self::new(key, KeyTransition::Up)
    }
}
