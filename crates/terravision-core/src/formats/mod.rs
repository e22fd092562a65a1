//! # Storage Formats
//!
//! Byte-level framing of persisted snapshots. Pure transformations; the
//! store backends do the I/O.

pub mod envelope;

pub use envelope::{StoredBlob, blob_from_bytes, blob_to_bytes};
