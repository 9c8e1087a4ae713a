//! Hook lifecycle, hotkey registration and event dispatch.

use crate::chord::Chord;
use crate::error::HookError;
use crate::event::KeyEvent;
use crate::hook::{platform_hook, EventSink, KeyboardHook};
use crate::key::KeyCode;
use crate::modifier::{classify, Modifiers};
use crossbeam_channel::{unbounded, Receiver};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;

type Action = Box<dyn Fn() + Send + Sync>;

struct Registration {
    chord: Chord,
    action: Action,
}

/// State shared between the manager and its dispatch worker.
#[derive(Default)]
struct Dispatcher {
    pressed: Mutex<Modifiers>,
    registration: RwLock<Option<Arc<Registration>>>,
}

impl Dispatcher {
    fn dispatch(&self, event: KeyEvent) {
        log::trace!("Key event: {:?}", event);

        let held = {
            let mut pressed = self.pressed.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(modifier) = classify(event.key) {
                if event.transition.is_down() {
                    pressed.insert(modifier.flag());
                } else if event.transition.is_up() {
                    pressed.remove(modifier.flag());
                }
            }
            *pressed
        };

        if !event.transition.is_up() {
            return;
        }

        let Some(registration) = self.current() else {
            return;
        };

        if Chord::with_modifiers(event.key, held).contains(&registration.chord) {
            log::debug!("Hotkey {} triggered", registration.chord);
            let result = panic::catch_unwind(AssertUnwindSafe(|| (registration.action)()));
            if result.is_err() {
                log::error!("Action for hotkey {} panicked", registration.chord);
            }
        }
    }

    fn current(&self) -> Option<Arc<Registration>> {
        self.registration
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn held(&self) -> Modifiers {
        *self.pressed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn run_worker(dispatcher: Arc<Dispatcher>, rx: Receiver<KeyEvent>) {
    log::debug!("Dispatch worker started");
    for event in rx {
        dispatcher.dispatch(event);
    }
    log::debug!("Dispatch worker stopped");
}

/// Builder for creating a hook manager.
pub struct HookManagerBuilder {
    hook: Option<Box<dyn KeyboardHook>>,
    worker_name: String,
}

impl Default for HookManagerBuilder {
    fn default() -> Self {
        Self {
            hook: None,
            worker_name: "hotkey-dispatch".to_string(),
        }
    }
}

impl HookManagerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific interception backend instead of the platform hook.
    pub fn hook(mut self, hook: impl KeyboardHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Name of the thread that runs registered actions.
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    /// Build the manager. No hook is installed until [`HookManager::start`].
    pub fn build(self) -> HookManager {
        HookManager {
            hook: self.hook.unwrap_or_else(platform_hook),
            worker_name: self.worker_name,
            active: false,
            dispatcher: Arc::new(Dispatcher::default()),
        }
    }
}

/// Owns a global keyboard hook and fires an action when a chord is released.
///
/// The action runs when the chord's base key goes up while at least the
/// chord's modifiers are still held. Extra held modifiers are tolerated.
/// Only one chord is registered at a time.
///
/// # Example
///
/// ```no_run
/// use chord_hook::{HookManager, ModifierKey};
///
/// fn main() -> anyhow::Result<()> {
///     let mut manager = HookManager::new();
///     manager.start()?;
///     manager.register_hotkey([ModifierKey::Control, ModifierKey::Shift], 0x41, || {
///         println!("Ctrl+Shift+A released");
///     })?;
///
///     // ... run the application ...
///
///     manager.stop()?;
///     Ok(())
/// }
/// ```
pub struct HookManager {
    hook: Box<dyn KeyboardHook>,
    worker_name: String,
    active: bool,
    dispatcher: Arc<Dispatcher>,
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HookManager {
    /// Create a manager backed by the platform hook.
    pub fn new() -> Self {
        HookManagerBuilder::new().build()
    }

    /// Create a builder.
    pub fn builder() -> HookManagerBuilder {
        HookManagerBuilder::new()
    }

    /// Install the keyboard hook. Does nothing if it is already installed.
    pub fn start(&mut self) -> Result<(), HookError> {
        if self.active {
            return Ok(());
        }

        let (tx, rx) = unbounded();
        let dispatcher = Arc::clone(&self.dispatcher);
        thread::Builder::new()
            .name(self.worker_name.clone())
            .spawn(move || run_worker(dispatcher, rx))
            .map_err(HookError::InstallFailed)?;

        // A failed install drops the sink, which ends the worker.
        self.hook.install(EventSink::new(tx))?;
        self.active = true;
        log::debug!("Keyboard hook started");
        Ok(())
    }

    /// Remove the keyboard hook. Does nothing if it is not installed.
    ///
    /// If the OS refuses to remove the hook the manager stays active and
    /// `stop` may be retried. Registration and held modifiers are kept.
    pub fn stop(&mut self) -> Result<(), HookError> {
        if !self.active {
            return Ok(());
        }

        self.hook.uninstall()?;
        self.active = false;
        log::debug!("Keyboard hook stopped");
        Ok(())
    }

    /// Check if the hook is currently installed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Register `action` to run when `modifiers` + `key` is released.
    ///
    /// `modifiers` may be a [`Modifiers`] flag value, a single
    /// [`ModifierKey`](crate::ModifierKey) or an array of them. A different
    /// chord replaces the current registration; the same chord is rejected
    /// with [`HookError::AlreadyRegistered`].
    pub fn register_hotkey<F>(
        &self,
        modifiers: impl Into<Modifiers>,
        key: KeyCode,
        action: F,
    ) -> Result<(), HookError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register_chord(Chord::with_modifiers(key, modifiers), action)
    }

    /// Register `action` for a key with no modifiers.
    pub fn register_key<F>(&self, key: KeyCode, action: F) -> Result<(), HookError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register_chord(Chord::new(key), action)
    }

    /// Register `action` for an already built chord.
    pub fn register_chord<F>(&self, chord: Chord, action: F) -> Result<(), HookError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self
            .dispatcher
            .registration
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.as_ref().is_some_and(|current| current.chord == chord) {
            return Err(HookError::AlreadyRegistered(chord));
        }

        if let Some(previous) = slot.as_ref() {
            log::debug!("Replacing hotkey {} with {}", previous.chord, chord);
        } else {
            log::debug!("Registered hotkey {}", chord);
        }

        *slot = Some(Arc::new(Registration {
            chord,
            action: Box::new(action),
        }));
        Ok(())
    }

    /// Remove the current registration. Returns whether one existed.
    pub fn clear_hotkey(&self) -> bool {
        let previous = self
            .dispatcher
            .registration
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = &previous {
            log::debug!("Cleared hotkey {}", previous.chord);
        }
        previous.is_some()
    }

    /// The currently registered chord, if any.
    pub fn registered_chord(&self) -> Option<Chord> {
        self.dispatcher.current().map(|r| r.chord)
    }

    /// Modifiers the hook currently sees as held.
    pub fn pressed_modifiers(&self) -> Modifiers {
        self.dispatcher.held()
    }
}

impl Drop for HookManager {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Failed to stop keyboard hook on drop: {}", e);
        }
    }
}
