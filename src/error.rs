//! Errors surfaced by the hook manager.

use crate::chord::Chord;

/// Errors that can occur while managing the keyboard hook.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("hotkey {0} is already registered")]
    AlreadyRegistered(Chord),

    #[error("failed to install keyboard hook: {0}")]
    InstallFailed(#[source] std::io::Error),

    #[error("failed to remove keyboard hook: {0}")]
    UnhookFailed(#[source] std::io::Error),

    #[error("keyboard hooks are not supported on this platform")]
    Unsupported,
}
