//! Global keyboard hook that fires a callback when a key chord is released.
//!
//! This crate installs a system-wide low-level keyboard hook, tracks which
//! modifier keys are held, and runs a registered action when a chord's base
//! key is released while its modifiers are still down.
//!
//! # Features
//!
//! - **System-wide** - Sees every key event regardless of which window has focus
//! - **Never swallows input** - Every event is passed on to the rest of the hook chain
//! - **Fast hook callback** - Events are handed to a background worker immediately
//! - **Permissive matching** - Extra held modifiers do not prevent a chord from firing
//! - **Text chords** - Parse and print `Ctrl+Shift+A` style chords
//!
//! # Example
//!
//! ```no_run
//! use chord_hook::{parse_chord, HookManager};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut manager = HookManager::new();
//!     manager.start()?;
//!
//!     // Actions run on the dispatch worker, not on the caller's thread
//!     manager.register_chord(parse_chord("ScrollLock")?, || {
//!         println!("Scroll Lock released");
//!     })?;
//!
//!     // ... run the application ...
//!
//!     manager.stop()?;
//!     Ok(())
//! }
//! ```
//!
//! # Platform support
//!
//! The live hook uses `WH_KEYBOARD_LL` on Windows. On other platforms
//! [`HookManager::start`] returns [`HookError::Unsupported`] unless a custom
//! [`KeyboardHook`] is supplied through [`HookManagerBuilder::hook`].

mod chord;
mod error;
mod event;
mod hook;
pub mod key;
mod manager;
mod modifier;

#[cfg(windows)]
mod win32;

pub use chord::{parse_chord, Chord};
pub use error::HookError;
pub use event::{KeyEvent, KeyTransition};
pub use hook::{EventSink, KeyboardHook};
pub use key::{parse_key, KeyCode};
pub use manager::{HookManager, HookManagerBuilder};
pub use modifier::{classify, expand, ModifierKey, Modifiers};

#[cfg(windows)]
pub use win32::LowLevelHook;
