//! Identity store implementation.

use log::{info, warn};

use super::{
    errors::{IdentityError, IdentityResult},
    models::LocalIdentity,
};
use crate::session::{
    Chips, PlayerId,
    constants::{INITIAL_BALANCE, MAX_IDENTITY_NICKNAME_LEN},
    normalize_nickname,
};
use crate::store::{Storage, StoreError};

/// Loads and saves the local identity record.
#[derive(Clone, Debug)]
pub struct IdentityStore<S> {
    storage: S,
}

impl<S: Storage> IdentityStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The saved identity, or `None` if absent or unreadable.
    pub fn load(&self) -> Option<LocalIdentity> {
        let raw = match self.storage.read() {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read local identity: {e}");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| warn!("Failed to parse local identity: {e}"))
            .ok()
    }

    /// Create and save a new identity with a fresh id and the initial
    /// balance.
    ///
    /// # Errors
    ///
    /// * `IdentityError::InvalidNickname` - Trimmed name out of bounds
    /// * `IdentityError::Store` - Backend failure
    pub fn create(&self, nickname: &str) -> IdentityResult<LocalIdentity> {
        let nickname = normalize_nickname(nickname, MAX_IDENTITY_NICKNAME_LEN)
            .ok_or_else(|| IdentityError::InvalidNickname(nickname.trim().to_string()))?;

        let identity = LocalIdentity {
            id: PlayerId::generate(),
            nickname,
            balance: INITIAL_BALANCE,
        };
        self.write(&identity)?;
        info!("Created local identity {}", identity.nickname);
        Ok(identity)
    }

    /// Save `identity` with a new balance.
    ///
    /// # Errors
    ///
    /// * `IdentityError::Store` - Backend failure
    pub fn update_balance(
        &self,
        identity: &LocalIdentity,
        balance: Chips,
    ) -> IdentityResult<LocalIdentity> {
        let updated = LocalIdentity {
            balance,
            ..identity.clone()
        };
        self.write(&updated)?;
        Ok(updated)
    }

    /// Restore the initial balance.
    ///
    /// # Errors
    ///
    /// * `IdentityError::Store` - Backend failure
    pub fn reset_balance(&self, identity: &LocalIdentity) -> IdentityResult<LocalIdentity> {
        self.update_balance(identity, INITIAL_BALANCE)
    }

    /// Forget the identity.
    ///
    /// # Errors
    ///
    /// * `IdentityError::Store` - Backend failure
    pub fn reset(&self) -> IdentityResult<()> {
        self.storage.remove()?;
        info!("Cleared local identity");
        Ok(())
    }

    fn write(&self, identity: &LocalIdentity) -> IdentityResult<()> {
        let encoded = serde_json::to_string(identity).map_err(StoreError::from)?;
        self.storage.overwrite(&encoded)?;
        Ok(())
    }
}
