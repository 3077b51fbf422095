//! Scopes the engine's document-level key handlers to pointer hover.

use crate::engine::KeyHandlers;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Held while the engine's key handlers are bound. Dropping it unbinds them.
pub struct KeyCapture<K: KeyHandlers> {
    handlers: Rc<K>,
}

impl<K: KeyHandlers> KeyCapture<K> {
    fn acquire(handlers: &Rc<K>) -> Self {
        handlers.attach();
        Self {
            handlers: Rc::clone(handlers),
        }
    }
}

impl<K: KeyHandlers> Drop for KeyCapture<K> {
    fn drop(&mut self) {
        self.handlers.detach();
    }
}

pub struct KeyBindingScope<K: KeyHandlers> {
    handlers: Rc<K>,
    enabled: Cell<bool>,
    installed: Cell<bool>,
    capture: RefCell<Option<KeyCapture<K>>>,
}

impl<K: KeyHandlers> KeyBindingScope<K> {
    pub fn new(handlers: K, enabled: bool) -> Self {
        Self {
            handlers: Rc::new(handlers),
            enabled: Cell::new(enabled),
            installed: Cell::new(false),
            capture: RefCell::new(None),
        }
    }

    /// First render: drop the engine's default global key handlers.
    pub fn install(&self) {
        if !self.installed.replace(true) {
            self.handlers.detach();
        }
    }

    pub fn pointer_enter(&self) {
        if !self.enabled.get() {
            return;
        }
        let mut capture = self.capture.borrow_mut();
        if capture.is_none() {
            *capture = Some(KeyCapture::acquire(&self.handlers));
            log::debug!("[keys] captured");
        }
    }

    pub fn pointer_leave(&self) {
        let released = self.capture.borrow_mut().take();
        match released {
            Some(capture) => drop(capture),
            None => self.handlers.detach(),
        }
    }

    /// Disabling while hovered releases at once; enabling waits for the
    /// next pointer-enter.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
        if !enabled {
            let released = self.capture.borrow_mut().take();
            drop(released);
        }
    }

    pub fn is_captured(&self) -> bool {
        self.capture.borrow().is_some()
    }
}
