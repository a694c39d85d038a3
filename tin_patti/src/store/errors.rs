//! Store error types.

use thiserror::Error;

use crate::session::InvariantViolation;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record decoded but describes an impossible table
    #[error("Corrupt session: {0}")]
    Corrupt(#[from] InvariantViolation),

    /// Another writer saved since this snapshot was read, or the table was
    /// closed and opened again
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    /// An in-memory record's mutex was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
