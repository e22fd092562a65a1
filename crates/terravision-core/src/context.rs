//! # Shared Context
//!
//! State that crosses the shell/journey boundary, passed explicitly as an
//! `Rc<SharedContext>` instead of being threaded through every call.
//!
//! - `ambient_on`: owned by the shell, read and propagated by the journey.
//! - `hydrated`: the persistence gate. While closed, the journey only writes
//!   when forced (initial snapshot, restart, unload flush).

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct SharedContext {
    ambient_on: Cell<bool>,
    hydrated: Cell<bool>,
}

/// Handle shared between the shell and the mounted journey.
pub type ContextRef = Rc<SharedContext>;

impl SharedContext {
    #[must_use]
    pub fn new(ambient_on: bool) -> ContextRef {
        Rc::new(Self {
            ambient_on: Cell::new(ambient_on),
            hydrated: Cell::new(false),
        })
    }

    #[must_use]
    pub fn ambient_on(&self) -> bool {
        self.ambient_on.get()
    }

    /// Set the ambient flag. Returns `true` if it changed.
    pub fn set_ambient(&self, on: bool) -> bool {
        self.ambient_on.replace(on) != on
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.get()
    }

    pub(crate) fn open_gate(&self) {
        self.hydrated.set(true);
    }

    pub(crate) fn close_gate(&self) {
        self.hydrated.set(false);
    }
}
