//! # Snapshot Storage
//!
//! The persistence adapter consumed by the journey machine and the shell.
//!
//! A store holds one opaque JSON snapshot. Reads never fail: a missing,
//! expired or unparsable blob reads as `None`. Writes are best-effort: a
//! store whose medium is unavailable drops them silently, and backend errors
//! are logged and absorbed. The in-memory state of the caller stays
//! authoritative for the session either way.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::{RedbStore, StoreSlot};

use serde_json::Value;
use std::rc::Rc;

/// One keyed snapshot slot.
pub trait SnapshotStore {
    /// Last written snapshot, or `None` if absent, expired or unparsable.
    fn read_snapshot(&self) -> Option<Value>;

    /// Best-effort write of the complete snapshot.
    fn write_snapshot(&self, snapshot: &Value);
}

/// A store shared between the shell and the machines it mounts.
pub type SharedStore = Rc<dyn SnapshotStore>;

/// Parse stored JSON text, logging and discarding malformed content.
pub(crate) fn parse_snapshot(key: &str, text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "unable to parse stored snapshot");
            None
        }
    }
}
