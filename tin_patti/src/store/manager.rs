//! Session store: load, conditional save, and reset of the table record.

use log::{debug, error, warn};
use uuid::Uuid;

use super::{
    errors::{StoreError, StoreResult},
    storage::Storage,
};
use crate::session::Session;

/// Persists the shared session snapshot in a [`Storage`] backend.
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restore the persisted session.
    ///
    /// A missing record yields the empty session. So does a record that
    /// cannot be read, fails to decode, or breaks a table invariant; those
    /// failures are logged and never surfaced.
    pub fn load(&self) -> Session {
        let raw = match self.storage.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::empty(),
            Err(e) => {
                error!("Failed to read saved session: {e}");
                return Session::empty();
            }
        };

        match decode(&raw) {
            Ok(session) => {
                debug!(
                    "Loaded session v{} with {} player(s)",
                    session.version,
                    session.players.len()
                );
                session
            }
            Err(e) => {
                warn!("Discarding saved session: {e}");
                Session::empty()
            }
        }
    }

    /// Persist `session`, overwriting the previous record.
    ///
    /// The write only happens if the stored record is still at
    /// `session.version` and belongs to the same table generation. The
    /// first save of an empty session starts a new generation. The saved
    /// copy carries the next version and is returned.
    ///
    /// # Errors
    ///
    /// * `StoreError::VersionConflict` - Another writer saved first, or the
    ///   snapshot predates the table being closed
    /// * `StoreError::Io` / `StoreError::Serialization` - Backend failure
    pub fn save(&self, session: &Session) -> StoreResult<Session> {
        let current = self.storage.read()?;
        let (found, generation) = stored_stamp(current.as_deref());
        if found != session.version || generation != session.generation {
            return Err(StoreError::VersionConflict {
                expected: session.version,
                found,
            });
        }

        let mut next = session.clone();
        next.version = found + 1;
        next.generation = Some(generation.unwrap_or_else(Uuid::new_v4));
        let encoded = serde_json::to_string(&next)?;

        if !self.storage.replace(current.as_deref(), &encoded)? {
            let (found, _) = stored_stamp(self.storage.read()?.as_deref());
            return Err(StoreError::VersionConflict {
                expected: session.version,
                found,
            });
        }

        debug!("Saved session v{}", next.version);
        Ok(next)
    }

    /// Delete the persisted record and return the empty session.
    ///
    /// # Errors
    ///
    /// Backend failures while deleting.
    pub fn reset(&self) -> StoreResult<Session> {
        self.storage.remove()?;
        debug!("Deleted saved session");
        Ok(Session::empty())
    }
}

fn decode(raw: &str) -> StoreResult<Session> {
    let session: Session = serde_json::from_str(raw)?;
    session.check_invariants()?;
    Ok(session)
}

// Version and generation of the stored record. A record that does not
// decode loads as the empty session, so it counts as version 0 with no
// generation.
fn stored_stamp(raw: Option<&str>) -> (u64, Option<Uuid>) {
    raw.and_then(|raw| decode(raw).ok())
        .map_or((0, None), |session| (session.version, session.generation))
}
