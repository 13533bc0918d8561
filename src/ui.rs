//! Spin button handle
//!
//! Layout and input dispatch belong to the host; the machine only needs to
//! lock the button while a spin is in flight.

use std::cell::Cell;
use std::rc::Rc;

/// Capability: something that lets the player start a spin
pub trait SpinTrigger {
    fn set_enabled(&mut self, enabled: bool);
}

/// Shared `interactive` flag of the spin button
#[derive(Debug, Clone)]
pub struct SpinButton {
    interactive: Rc<Cell<bool>>,
}

impl Default for SpinButton {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinButton {
    /// New button, enabled
    pub fn new() -> Self {
        Self {
            interactive: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interactive.get()
    }
}

impl SpinTrigger for SpinButton {
    fn set_enabled(&mut self, enabled: bool) {
        self.interactive.set(enabled);
    }
}
