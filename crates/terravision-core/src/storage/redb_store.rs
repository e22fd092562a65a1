//! # redb-backed Snapshot Storage
//!
//! A durable table of named snapshot blobs using the redb embedded database.
//!
//! Each value is a framed [`StoredBlob`](crate::formats::StoredBlob) carrying
//! its own retention window, so an expired snapshot reads as absent without
//! any background sweep. A [`StoreSlot`] binds one key and window and is the
//! [`SnapshotStore`] handed to the machines.

use super::{SnapshotStore, parse_snapshot};
use crate::formats::{StoredBlob, blob_from_bytes, blob_to_bytes};
use crate::primitives::{JOURNEY_KEY, JOURNEY_MAX_AGE_SECS, PASSPORT_KEY, PASSPORT_MAX_AGE_SECS};
use crate::TerraError;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::Value;
use std::path::Path;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Table of snapshots: key -> framed blob bytes
const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

fn io_err(e: impl std::fmt::Display) -> TerraError {
    TerraError::IoError(e.to_string())
}

/// Current Unix time in seconds (0 if the clock is before the epoch).
#[must_use]
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A snapshot database file.
#[derive(Clone)]
pub struct RedbStore {
    db: Rc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a snapshot database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TerraError> {
        let db = Database::create(path.as_ref())
            .map_err(|e| TerraError::StorageError(e.to_string()))?;

        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(SNAPSHOTS).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db: Rc::new(db) })
    }

    /// Slot for `key` with the given retention window.
    #[must_use]
    pub fn slot(&self, key: impl Into<String>, max_age_secs: u64) -> StoreSlot {
        StoreSlot {
            db: Rc::clone(&self.db),
            key: key.into(),
            max_age_secs,
        }
    }

    /// The journey snapshot slot (7 days).
    #[must_use]
    pub fn journey_slot(&self) -> StoreSlot {
        self.slot(JOURNEY_KEY, JOURNEY_MAX_AGE_SECS)
    }

    /// The passport identity slot (1 year).
    #[must_use]
    pub fn passport_slot(&self) -> StoreSlot {
        self.slot(PASSPORT_KEY, PASSPORT_MAX_AGE_SECS)
    }

    /// Keys currently present, in key order.
    pub fn keys(&self) -> Result<Vec<String>, TerraError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SNAPSHOTS).map_err(io_err)?;
        let mut keys = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (key, _) = entry.map_err(io_err)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }

    /// Delete one key. Returns `true` if it existed.
    pub fn remove(&self, key: &str) -> Result<bool, TerraError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let existed = {
            let mut table = write_txn.open_table(SNAPSHOTS).map_err(io_err)?;
            table.remove(key).map_err(io_err)?.is_some()
        };
        write_txn.commit().map_err(io_err)?;
        Ok(existed)
    }
}

/// One key of a [`RedbStore`] with its retention window.
#[derive(Clone)]
pub struct StoreSlot {
    db: Rc<Database>,
    key: String,
    max_age_secs: u64,
}

impl std::fmt::Debug for StoreSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSlot")
            .field("key", &self.key)
            .field("max_age_secs", &self.max_age_secs)
            .finish_non_exhaustive()
    }
}

impl StoreSlot {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read as of `now_secs`. Expired blobs read as `Ok(None)`.
    pub fn read_at(&self, now_secs: u64) -> Result<Option<Value>, TerraError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SNAPSHOTS).map_err(io_err)?;
        let Some(bytes) = table
            .get(self.key.as_str())
            .map_err(io_err)?
            .map(|guard| guard.value().to_vec())
        else {
            return Ok(None);
        };

        let blob = blob_from_bytes(&bytes)?;
        if blob.is_expired(now_secs) {
            tracing::debug!(key = %self.key, "stored snapshot expired");
            return Ok(None);
        }
        Ok(parse_snapshot(&self.key, &blob.json))
    }

    /// Write as of `now_secs`, replacing any previous blob.
    pub fn write_at(&self, snapshot: &Value, now_secs: u64) -> Result<(), TerraError> {
        let blob = StoredBlob {
            written_at_secs: now_secs,
            max_age_secs: self.max_age_secs,
            json: snapshot.to_string(),
        };
        let bytes = blob_to_bytes(&blob)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(SNAPSHOTS).map_err(io_err)?;
            table
                .insert(self.key.as_str(), bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }
}

impl SnapshotStore for StoreSlot {
    fn read_snapshot(&self) -> Option<Value> {
        match self.read_at(unix_now_secs()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "snapshot read failed");
                None
            }
        }
    }

    fn write_snapshot(&self, snapshot: &Value) {
        if let Err(e) = self.write_at(snapshot, unix_now_secs()) {
            tracing::warn!(key = %self.key, error = %e, "snapshot write failed");
        }
    }
}
