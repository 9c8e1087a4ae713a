//! Windows implementation using a `WH_KEYBOARD_LL` hook.
//!
//! Low-level hooks are called on the thread that installed them, and only
//! while that thread pumps messages. Each [`LowLevelHook`] therefore owns a
//! dedicated thread that installs the hook, runs a message loop and removes
//! the hook again when asked to.

use crate::error::HookError;
use crate::event::{KeyEvent, KeyTransition};
use crate::hook::{EventSink, KeyboardHook};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::cell::RefCell;
use std::io;
use std::thread::{self, JoinHandle};
use windows_sys::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, KBDLLHOOKSTRUCT, MSG, PM_NOREMOVE,
    WH_KEYBOARD_LL, WM_APP, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

/// Thread message asking the hook thread to remove its hook.
const WM_UNHOOK: u32 = WM_APP + 1;

// The hook procedure is a fixed entry point; it finds its sink here.
thread_local! {
    static SINK: RefCell<Option<EventSink>> = const { RefCell::new(None) };
}

struct HookThread {
    thread_id: u32,
    handle: JoinHandle<()>,
    reply_rx: Receiver<io::Result<()>>,
}

/// A `WH_KEYBOARD_LL` hook running on its own message-loop thread.
#[derive(Default)]
pub struct LowLevelHook {
    thread: Option<HookThread>,
}

impl LowLevelHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyboardHook for LowLevelHook {
    fn install(&mut self, sink: EventSink) -> Result<(), HookError> {
        let (ready_tx, ready_rx) = bounded(1);
        let (reply_tx, reply_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("keyboard-hook".to_string())
            .spawn(move || run_hook_thread(sink, ready_tx, reply_tx))
            .map_err(HookError::InstallFailed)?;

        let thread_id = match ready_rx.recv() {
            Ok(Ok(thread_id)) => thread_id,
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(HookError::InstallFailed(e));
            }
            Err(_) => {
                let _ = handle.join();
                return Err(HookError::InstallFailed(io::Error::other(
                    "hook thread exited before installing the hook",
                )));
            }
        };

        log::debug!("Keyboard hook installed on thread {}", thread_id);
        self.thread = Some(HookThread {
            thread_id,
            handle,
            reply_rx,
        });
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), HookError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        // A finished thread took its hook with it.
        if thread.handle.is_finished() {
            log::warn!("Keyboard hook thread already exited");
            let _ = thread.handle.join();
            return Ok(());
        }

        if unsafe { PostThreadMessageW(thread.thread_id, WM_UNHOOK, 0, 0) } == 0 {
            let e = io::Error::last_os_error();
            self.thread = Some(thread);
            return Err(HookError::UnhookFailed(e));
        }

        match thread.reply_rx.recv() {
            Ok(Ok(())) | Err(_) => {
                let _ = thread.handle.join();
                log::debug!("Keyboard hook removed");
                Ok(())
            }
            Ok(Err(e)) => {
                self.thread = Some(thread);
                Err(HookError::UnhookFailed(e))
            }
        }
    }
}

fn run_hook_thread(
    sink: EventSink,
    ready_tx: Sender<io::Result<u32>>,
    reply_tx: Sender<io::Result<()>>,
) {
    let mut msg: MSG = unsafe { std::mem::zeroed() };

    // Make sure the thread has a message queue before anyone posts to it.
    unsafe { PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_NOREMOVE) };

    SINK.with(|s| *s.borrow_mut() = Some(sink));

    let hook = unsafe {
        SetWindowsHookExW(
            WH_KEYBOARD_LL,
            Some(keyboard_proc),
            GetModuleHandleW(std::ptr::null()),
            0,
        )
    };
    if hook.is_null() {
        let _ = ready_tx.send(Err(io::Error::last_os_error()));
        SINK.with(|s| s.borrow_mut().take());
        return;
    }

    let _ = ready_tx.send(Ok(unsafe { GetCurrentThreadId() }));

    loop {
        let ret = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
        if ret == 0 {
            break;
        }
        if ret == -1 {
            log::error!("Keyboard hook message loop failed: {}", io::Error::last_os_error());
            break;
        }

        if msg.message == WM_UNHOOK {
            if unsafe { UnhookWindowsHookEx(hook) } != 0 {
                let _ = reply_tx.send(Ok(()));
                break;
            }
            let _ = reply_tx.send(Err(io::Error::last_os_error()));
            continue;
        }

        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Dropping the sink lets the dispatch worker drain and exit.
    SINK.with(|s| s.borrow_mut().take());
}

/// Map a keyboard hook message to a key transition.
fn transition_from_message(message: u32) -> Option<KeyTransition> {
    match message {
        WM_KEYDOWN => Some(KeyTransition::Down),
        WM_KEYUP => Some(KeyTransition::Up),
        WM_SYSKEYDOWN => Some(KeyTransition::SysDown),
        WM_SYSKEYUP => Some(KeyTransition::SysUp),
        _ => None,
    }
}

/// Low-level keyboard hook procedure. Never swallows an event.
unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let info = &*(lparam as *const KBDLLHOOKSTRUCT);
        if let Some(transition) = transition_from_message(wparam as u32) {
            SINK.with(|sink| {
                if let Some(sink) = sink.borrow().as_ref() {
                    sink.submit(KeyEvent::new(info.vkCode, transition));
                }
            });
        }
    }

    CallNextHookEx(std::ptr::null_mut(), code, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_from_message() {
        assert_eq!(transition_from_message(WM_KEYDOWN), Some(KeyTransition::Down));
        assert_eq!(transition_from_message(WM_KEYUP), Some(KeyTransition::Up));
        assert_eq!(transition_from_message(WM_SYSKEYDOWN), Some(KeyTransition::SysDown));
        assert_eq!(transition_from_message(WM_SYSKEYUP), Some(KeyTransition::SysUp));
        assert_eq!(transition_from_message(WM_APP), None);
    }

    #[test]
    fn test_uninstall_without_install() {
        let mut hook = LowLevelHook::new();
        assert!(hook.uninstall().is_ok());
    }
}
