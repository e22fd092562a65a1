//! In-process snapshot slot.

use super::{SnapshotStore, parse_snapshot};
use serde_json::Value;
use std::cell::{Cell, RefCell};

/// A single snapshot kept as JSON text in memory.
///
/// Used by tests and by hosts without durable storage. `set_available(false)`
/// models a medium that refuses writes.
#[derive(Debug)]
pub struct MemoryStore {
    key: String,
    text: RefCell<Option<String>>,
    available: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// An empty, available slot.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: RefCell::new(None),
            available: Cell::new(true),
            writes: Cell::new(0),
        }
    }

    /// A slot pre-filled with `snapshot`.
    #[must_use]
    pub fn with_snapshot(key: impl Into<String>, snapshot: &Value) -> Self {
        let store = Self::new(key);
        store.set_raw(snapshot.to_string());
        store
    }

    /// Replace the stored text verbatim, bypassing the write counter.
    pub fn set_raw(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = Some(text.into());
    }

    /// Drop the stored snapshot.
    pub fn clear(&self) {
        *self.text.borrow_mut() = None;
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Number of writes accepted so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Current snapshot, parsed.
    #[must_use]
    pub fn contents(&self) -> Option<Value> {
        self.read_snapshot()
    }
}

impl SnapshotStore for MemoryStore {
    fn read_snapshot(&self) -> Option<Value> {
        if !self.available.get() {
            return None;
        }
        let text = self.text.borrow();
        text.as_deref().and_then(|t| parse_snapshot(&self.key, t))
    }

    fn write_snapshot(&self, snapshot: &Value) {
        if !self.available.get() {
            tracing::debug!(key = %self.key, "storage unavailable, write dropped");
            return;
        }
        *self.text.borrow_mut() = Some(snapshot.to_string());
        self.writes.set(self.writes.get().saturating_add(1));
    }
}
