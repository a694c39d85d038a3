//! Session data models.

use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use super::constants::{MAX_PLAYERS, MIN_NICKNAME_LEN, TABLE_ID};

/// Chip amounts. Unsigned, so balances and bets can never go negative.
pub type Chips = u64;

/// Unique, immutable participant identifier.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A participant seated at the shared table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Participant {
    pub id: PlayerId,
    pub nickname: String,
    pub current_bet: Chips,
    pub balance: Chips,
    pub is_admin: bool,
}

impl Participant {
    #[must_use]
    pub fn new(id: PlayerId, nickname: String, is_admin: bool) -> Self {
        Self {
            id,
            nickname,
            current_bet: 0,
            balance: 0,
            is_admin,
        }
    }
}

/// The complete shared table state.
///
/// The persisted record is this struct serialized verbatim. Every field is
/// required when decoding; a record with missing or unknown fields is
/// rejected as a whole rather than partially recovered.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Session {
    pub id: String,
    pub players: Vec<Participant>,
    pub total_pot: Chips,
    pub round_active: bool,
    pub max_players: usize,
    #[serde(deserialize_with = "required_option")]
    pub admin_id: Option<PlayerId>,
    /// Number of successful saves since the record was created. Used for
    /// optimistic concurrency control between writers sharing one record.
    pub version: u64,
    /// Identifies one table from its first save until it is closed. A
    /// record deleted and recreated gets a new generation, so a snapshot
    /// from the old table never matches it even when versions line up.
    #[serde(deserialize_with = "required_option")]
    pub generation: Option<Uuid>,
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}

impl Session {
    /// The canonical empty session: no players, no pot, no admin.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: TABLE_ID.to_string(),
            players: Vec::with_capacity(MAX_PLAYERS),
            total_pot: 0,
            round_active: false,
            max_players: MAX_PLAYERS,
            admin_id: None,
            version: 0,
            generation: None,
        }
    }

    /// True when the session holds no table state, ignoring its version and
    /// generation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
            && self.total_pot == 0
            && !self.round_active
            && self.admin_id.is_none()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Participant> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Participant> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Sum of every participant's current-round bet.
    #[must_use]
    pub fn sum_of_bets(&self) -> Chips {
        self.players
            .iter()
            .fold(0, |sum: Chips, p| sum.saturating_add(p.current_bet))
    }

    /// Verify every table invariant.
    ///
    /// # Errors
    ///
    /// Returns the first invariant the snapshot breaks.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.id != TABLE_ID {
            return Err(InvariantViolation::WrongTable(self.id.clone()));
        }
        if self.max_players != MAX_PLAYERS {
            return Err(InvariantViolation::WrongCapacity(self.max_players));
        }
        if self.players.len() > self.max_players {
            return Err(InvariantViolation::TooManyPlayers {
                count: self.players.len(),
                max: self.max_players,
            });
        }

        let bets = self.sum_of_bets();
        if self.total_pot != bets {
            return Err(InvariantViolation::PotMismatch {
                pot: self.total_pot,
                bets,
            });
        }

        let mut seen = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            if !seen.insert(player.id) {
                return Err(InvariantViolation::DuplicatePlayer(player.id));
            }
        }

        let mut admins = self.players.iter().filter(|p| p.is_admin);
        let admin = admins.next();
        if admins.next().is_some() {
            return Err(InvariantViolation::MultipleAdmins);
        }
        match (self.admin_id, admin) {
            (None, None) => Ok(()),
            (Some(id), Some(admin)) if admin.id == id => Ok(()),
            _ => Err(InvariantViolation::AdminMismatch),
        }
    }
}

/// A broken table invariant.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum InvariantViolation {
    #[error("unexpected table id {0:?}")]
    WrongTable(String),
    #[error("unexpected table capacity {0}")]
    WrongCapacity(usize),
    #[error("{count} players seated at a table for {max}")]
    TooManyPlayers { count: usize, max: usize },
    #[error("pot of {pot} does not match {bets} in bets")]
    PotMismatch { pot: Chips, bets: Chips },
    #[error("player {0} is seated twice")]
    DuplicatePlayer(PlayerId),
    #[error("more than one player is marked admin")]
    MultipleAdmins,
    #[error("admin id does not match the admin flag")]
    AdminMismatch,
}

/// Trim a nickname and check its length in characters.
///
/// Returns `None` when the trimmed name is shorter than
/// [`MIN_NICKNAME_LEN`] or longer than `max_len`.
#[must_use]
pub fn normalize_nickname(raw: &str, max_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    (MIN_NICKNAME_LEN..=max_len)
        .contains(&len)
        .then(|| trimmed.to_string())
}

// `Option` fields are implicitly optional in serde; the session record
// requires `adminId` to be present, even if null.
fn required_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::constants::MAX_NICKNAME_LEN;

    fn seated(nickname: &str, bet: Chips, is_admin: bool) -> Participant {
        Participant {
            id: PlayerId::generate(),
            nickname: nickname.to_string(),
            current_bet: bet,
            balance: 100,
            is_admin,
        }
    }

    #[test]
    fn test_empty_session_is_canonical() {
        let session = Session::empty();
        assert_eq!(session.id, "shared-table");
        assert!(session.players.is_empty());
        assert_eq!(session.total_pot, 0);
        assert!(!session.round_active);
        assert_eq!(session.max_players, 5);
        assert!(session.admin_id.is_none());
        assert!(session.is_empty());
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut session = Session::empty();
        session.players.push(seated("Alice", 0, false));

        let value = serde_json::to_value(&session).expect("serialize");
        let object = value.as_object().expect("flat object");
        for key in [
            "id",
            "players",
            "totalPot",
            "roundActive",
            "maxPlayers",
            "adminId",
            "version",
            "generation",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(object["adminId"].is_null());
        assert!(object["generation"].is_null());

        let player = object["players"][0].as_object().expect("player object");
        for key in ["id", "nickname", "currentBet", "balance", "isAdmin"] {
            assert!(player.contains_key(key), "missing player field {key}");
        }
    }

    #[test]
    fn test_missing_admin_id_is_rejected() {
        let raw = r#"{"id":"shared-table","players":[],"totalPot":0,"roundActive":false,"maxPlayers":5,"version":0,"generation":null}"#;
        assert!(serde_json::from_str::<Session>(raw).is_err());
    }

    #[test]
    fn test_missing_generation_is_rejected() {
        let raw = r#"{"id":"shared-table","players":[],"totalPot":0,"roundActive":false,"maxPlayers":5,"adminId":null,"version":0}"#;
        assert!(serde_json::from_str::<Session>(raw).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let raw = r#"{"id":"shared-table","players":[],"totalPot":0,"roundActive":false,"maxPlayers":5,"adminId":null,"version":0,"generation":null,"extra":1}"#;
        assert!(serde_json::from_str::<Session>(raw).is_err());
    }

    #[test]
    fn test_negative_balance_is_rejected() {
        let id = PlayerId::generate();
        let raw = format!(
            r#"{{"id":"shared-table","players":[{{"id":"{id}","nickname":"Al","currentBet":0,"balance":-5,"isAdmin":false}}],"totalPot":0,"roundActive":false,"maxPlayers":5,"adminId":null,"version":1,"generation":null}}"#
        );
        assert!(serde_json::from_str::<Session>(&raw).is_err());
    }

    #[test]
    fn test_pot_mismatch_detected() {
        let mut session = Session::empty();
        session.players.push(seated("Alice", 20, false));
        session.total_pot = 10;

        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::PotMismatch { pot: 10, bets: 20 })
        );
    }

    #[test]
    fn test_admin_flag_must_match_admin_id() {
        let mut session = Session::empty();
        let admin = seated("Alice", 0, true);
        session.players.push(admin);
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::AdminMismatch)
        );

        session.admin_id = Some(session.players[0].id);
        assert!(session.check_invariants().is_ok());

        session.players.push(seated("Bob", 0, true));
        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::MultipleAdmins)
        );
    }

    #[test]
    fn test_duplicate_player_detected() {
        let mut session = Session::empty();
        let player = seated("Alice", 0, false);
        session.players.push(player.clone());
        session.players.push(player.clone());

        assert_eq!(
            session.check_invariants(),
            Err(InvariantViolation::DuplicatePlayer(player.id))
        );
    }

    #[test]
    fn test_normalize_nickname() {
        assert_eq!(
            normalize_nickname("  Alice ", MAX_NICKNAME_LEN),
            Some("Alice".to_string())
        );
        assert_eq!(normalize_nickname("   ", MAX_NICKNAME_LEN), None);
        assert_eq!(normalize_nickname("A", MAX_NICKNAME_LEN), None);
        assert_eq!(normalize_nickname(&"x".repeat(16), MAX_NICKNAME_LEN), None);
        assert!(normalize_nickname(&"é".repeat(15), MAX_NICKNAME_LEN).is_some());
    }

    #[test]
    fn test_player_id_parses_from_display() {
        let id = PlayerId::generate();
        let parsed: PlayerId = id.to_string().parse().expect("valid uuid");
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PlayerId>().is_err());
    }
}
