//! Read-only projections over a session snapshot.

use std::fmt;

use super::models::{Chips, Participant, Session};

/// The participant holding the admin slot, if any.
#[must_use]
pub fn current_admin(session: &Session) -> Option<&Participant> {
    session
        .admin_id
        .and_then(|admin_id| session.player(admin_id))
}

#[must_use]
pub fn is_admin_set(session: &Session) -> bool {
    session.admin_id.is_some()
}

/// Players with chips in the current pot, in seating order.
pub fn players_with_bets(session: &Session) -> impl Iterator<Item = &Participant> {
    session.players.iter().filter(|p| p.current_bet > 0)
}

#[must_use]
pub fn open_seats(session: &Session) -> usize {
    session.max_players.saturating_sub(session.players.len())
}

/// Headline numbers for rendering the table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableSummary {
    pub player_count: usize,
    pub max_players: usize,
    pub total_pot: Chips,
    pub players_with_bets: usize,
    pub round_active: bool,
    pub admin: Option<String>,
}

impl From<&Session> for TableSummary {
    fn from(session: &Session) -> Self {
        Self {
            player_count: session.players.len(),
            max_players: session.max_players,
            total_pot: session.total_pot,
            players_with_bets: players_with_bets(session).count(),
            round_active: session.round_active,
            admin: current_admin(session).map(|p| p.nickname.clone()),
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} players, pot {} from {} bettor(s)",
            self.player_count, self.max_players, self.total_pot, self.players_with_bets
        )?;
        if self.round_active {
            write!(f, ", round in progress")?;
        }
        match &self.admin {
            Some(admin) => write!(f, ", admin {admin}"),
            None => write!(f, ", no admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mutators;

    #[test]
    fn test_empty_table_view() {
        let session = Session::empty();
        assert!(current_admin(&session).is_none());
        assert!(!is_admin_set(&session));
        assert_eq!(open_seats(&session), 5);
        assert_eq!(
            TableSummary::from(&session).to_string(),
            "0/5 players, pot 0 from 0 bettor(s), no admin"
        );
    }

    #[test]
    fn test_admin_projection_follows_admin_id() {
        let (session, alice) =
            mutators::add_player(&Session::empty(), "Alice", true).expect("seat");
        let (session, _) = mutators::add_player(&session, "Bob", false).expect("seat");

        assert!(is_admin_set(&session));
        assert_eq!(current_admin(&session).map(|p| p.id), Some(alice));
        assert_eq!(open_seats(&session), 3);

        let session = mutators::remove_player(&session, alice).expect("remove");
        assert!(current_admin(&session).is_none());
        assert!(!is_admin_set(&session));
    }

    #[test]
    fn test_summary_counts_bettors() {
        let (session, alice) =
            mutators::add_player(&Session::empty(), "Alice", true).expect("seat");
        let (session, bob) = mutators::add_player(&session, "Bob", false).expect("seat");
        let session = mutators::distribute_initial_balance(&session, alice).expect("fund");
        let session = mutators::place_bet(&session, bob, 10).expect("bet");

        let bettors: Vec<_> = players_with_bets(&session).map(|p| p.id).collect();
        assert_eq!(bettors, vec![bob]);

        let summary = TableSummary::from(&session);
        assert_eq!(summary.players_with_bets, 1);
        assert_eq!(summary.total_pot, 10);
        assert_eq!(
            summary.to_string(),
            "2/5 players, pot 10 from 1 bettor(s), admin Alice"
        );

        // A record written elsewhere may carry the round flag.
        let mut session = session;
        session.round_active = true;
        assert_eq!(
            TableSummary::from(&session).to_string(),
            "2/5 players, pot 10 from 1 bettor(s), round in progress, admin Alice"
        );
    }
}
