//! Error types for cart persistence.
//!
//! None of these ever reach callers of [`CartStore`](crate::CartStore)
//! operations. The store logs them where they are absorbed and degrades to an
//! empty or unchanged cart. Storage adapters and the snapshot codec return
//! them so they can be tested and reused on their own.

use thiserror::Error;

/// Errors from a [`Storage`](crate::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the slot quota.
    #[error("Storage quota exceeded: need {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Maximum bytes allowed.
        quota: usize,
    },

    /// The key cannot be used with this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Errors encoding or decoding a persisted cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The payload is not valid JSON, or not a cart.
    #[error("Malformed cart snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure while moving a cart between memory and its slot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Snapshot codec failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}
