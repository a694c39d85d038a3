//! Identity error types.

use thiserror::Error;

use crate::store::StoreError;

/// Identity errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Nickname empty or out of bounds after trimming
    #[error("Invalid nickname: {0:?}")]
    InvalidNickname(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;
