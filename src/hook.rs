//! The interception seam between the OS and the dispatch worker.

use crate::error::HookError;
use crate::event::KeyEvent;
use crossbeam_channel::Sender;

/// Hands key events off to the dispatch worker without blocking.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<KeyEvent>,
}

impl EventSink {
    pub(crate) fn new(tx: Sender<KeyEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event for dispatch. Returns false if the worker is gone.
    pub fn submit(&self, event: KeyEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }
}

/// A system-wide keyboard interception.
///
/// Implementations observe every key event, forward it unmodified to the
/// rest of the OS hook chain and pass a copy to the [`EventSink`] given at
/// install time. Once `uninstall` returns `Ok`, no further events may reach
/// the sink and the sink must be dropped.
pub trait KeyboardHook: Send {
    fn install(&mut self, sink: EventSink) -> Result<(), HookError>;

    fn uninstall(&mut self) -> Result<(), HookError>;
}

/// The platform's low-level keyboard hook.
#[cfg(windows)]
pub fn platform_hook() -> Box<dyn KeyboardHook> {
    Box::new(crate::win32::LowLevelHook::new())
}

/// The platform's low-level keyboard hook (unsupported platform stub).
#[cfg(not(windows))]
pub fn platform_hook() -> Box<dyn KeyboardHook> {
    Box::new(UnsupportedHook)
}

#[cfg(not(windows))]
struct UnsupportedHook;

#[cfg(not(windows))]
impl KeyboardHook for UnsupportedHook {
    fn install(&mut self, _sink: EventSink) -> Result<(), HookError> {
        Err(HookError::Unsupported)
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_submit_reports_closed_worker() {
        let (tx, rx) = unbounded();
        let sink = EventSink::new(tx);

        assert!(sink.submit(KeyEvent::down(0x41)));
        assert_eq!(rx.try_recv(), Ok(KeyEvent::down(0x41)));

        drop(rx);
        assert!(!sink.submit(KeyEvent::up(0x41)));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_platform_hook_unsupported() {
        let (tx, _rx) = unbounded();
        let mut hook = platform_hook();
        assert!(matches!(
            hook.install(EventSink::new(tx)),
            Err(HookError::Unsupported)
        ));
    }
}
