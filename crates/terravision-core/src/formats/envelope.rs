//! # Stored Blob Envelope
//!
//! Binary framing for snapshots kept in a durable store.
//!
//! Format: 5 header bytes + postcard-serialized [`StoredBlob`].
//! - 4 bytes: Magic ("TVSN")
//! - 1 byte: Version
//!
//! The JSON snapshot itself travels as text inside the record so the store
//! stays agnostic of the snapshot shape. Size and header are validated
//! before the payload is touched.

use crate::{TerraError, primitives};
use serde::{Deserialize, Serialize};

/// Magic plus version byte.
const HEADER_LEN: usize = primitives::MAGIC_BYTES.len() + 1;

// =============================================================================
// RECORD
// =============================================================================

/// One stored snapshot with its retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Unix seconds at write time.
    pub written_at_secs: u64,
    /// Retention window in seconds.
    pub max_age_secs: u64,
    /// The snapshot as JSON text.
    pub json: String,
}

impl StoredBlob {
    /// Check whether the blob outlived its retention window at `now_secs`.
    #[must_use]
    pub fn is_expired(&self, now_secs: u64) -> bool {
        now_secs.saturating_sub(self.written_at_secs) >= self.max_age_secs
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Frame a record as header + payload.
pub fn blob_to_bytes(blob: &StoredBlob) -> Result<Vec<u8>, TerraError> {
    let payload =
        postcard::to_stdvec(blob).map_err(|e| TerraError::SerializationError(e.to_string()))?;

    let mut framed = Vec::with_capacity(HEADER_LEN + payload.len());
    framed.extend_from_slice(primitives::MAGIC_BYTES);
    framed.push(primitives::FORMAT_VERSION);
    framed.extend_from_slice(&payload);
    Ok(framed)
}

/// Parse a framed record.
///
/// Size, magic and version are checked before the payload is decoded.
pub fn blob_from_bytes(bytes: &[u8]) -> Result<StoredBlob, TerraError> {
    if bytes.len() > primitives::MAX_BLOB_SIZE {
        return Err(TerraError::SerializationError(format!(
            "stored blob of {} bytes exceeds the {} byte limit",
            bytes.len(),
            primitives::MAX_BLOB_SIZE
        )));
    }

    let Some((magic, rest)) = bytes.split_first_chunk::<4>() else {
        return Err(TerraError::SerializationError(format!(
            "stored blob too short: {} bytes",
            bytes.len()
        )));
    };
    if magic != primitives::MAGIC_BYTES {
        return Err(TerraError::SerializationError(
            "stored blob has invalid magic bytes".to_string(),
        ));
    }
    match rest.split_first() {
        Some((&primitives::FORMAT_VERSION, payload)) => postcard::from_bytes(payload).map_err(|e| {
            TerraError::SerializationError(format!("failed to decode stored blob: {}", e))
        }),
        Some((version, _)) => Err(TerraError::SerializationError(format!(
            "stored blob version {} is not supported (expected {})",
            version,
            primitives::FORMAT_VERSION
        ))),
        None => Err(TerraError::SerializationError(
            "stored blob has no version byte".to_string(),
        )),
    }
}

// =============================================================================
// TESTS
// =============================================================================
