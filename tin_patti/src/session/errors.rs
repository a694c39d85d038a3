//! Table operation errors.

use thiserror::Error;

use super::models::{Chips, PlayerId};
use crate::store::StoreError;

/// Reasons a table operation is rejected.
///
/// A rejected operation never changes the session.
#[derive(Debug, Error)]
pub enum TableError {
    /// Every seat is taken
    #[error("table is full ({max} players)")]
    CapacityReached { max: usize },

    /// No participant with this id
    #[error("player {0} is not at the table")]
    PlayerNotFound(PlayerId),

    /// Identity is already seated
    #[error("player {0} is already at the table")]
    PlayerAlreadySeated(PlayerId),

    /// Bet exceeds the player's balance
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientFunds { available: Chips, required: Chips },

    /// Amount must be positive
    #[error("invalid amount: {0}")]
    InvalidAmount(Chips),

    /// Nickname empty or out of bounds after trimming
    #[error("invalid nickname: {0:?}")]
    InvalidNickname(String),

    /// Another player already uses this nickname (case-insensitive)
    #[error("nickname {0:?} is already taken")]
    NicknameTaken(String),

    #[error("the table already has an admin")]
    AdminAlreadySet,

    #[error("the table has no admin")]
    AdminNotSet,

    /// Table has an admin but the caller did not identify
    #[error("only the admin can do that")]
    AdminRequired,

    /// Caller is not the table admin
    #[error("{0} is not the table admin")]
    NotAdmin(PlayerId),

    /// Nothing to distribute
    #[error("the pot is empty")]
    EmptyPot,

    /// Persisting the session failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl TableError {
    /// Message safe to show to a player. Storage details and raw ids stay in
    /// the logs.
    pub fn client_message(&self) -> String {
        match self {
            TableError::PlayerNotFound(_) => "Player is not at the table".to_string(),
            TableError::PlayerAlreadySeated(_) => "Player is already at the table".to_string(),
            TableError::NotAdmin(_) => "Only the admin can do that".to_string(),
            TableError::Store(StoreError::VersionConflict { .. }) => {
                "The table changed elsewhere; try again".to_string()
            }
            TableError::Store(_) => "Could not save the table".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
