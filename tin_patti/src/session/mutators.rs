//! Pure session transitions.
//!
//! Each function borrows the current snapshot and returns the next one. A
//! rejected operation returns an error and leaves the borrowed snapshot as it
//! was, so callers keep using it unchanged.
//!
//! Privileged operations take the caller's id and only proceed when the
//! caller is the table admin.

use super::{
    constants::{INITIAL_BALANCE, MAX_IDENTITY_NICKNAME_LEN, MAX_NICKNAME_LEN},
    errors::{TableError, TableResult},
    models::{Chips, Participant, PlayerId, Session, normalize_nickname},
};
use crate::identity::LocalIdentity;

/// Seat a new player with a fresh id and no chips.
///
/// # Errors
///
/// * `TableError::CapacityReached` - Every seat is taken; no id is issued
/// * `TableError::InvalidNickname` - Trimmed name is empty or out of bounds
/// * `TableError::NicknameTaken` - Name already used at this table
/// * `TableError::AdminAlreadySet` - `is_admin` while an admin exists
pub fn add_player(
    session: &Session,
    nickname: &str,
    is_admin: bool,
) -> TableResult<(Session, PlayerId)> {
    let nickname = check_seat(session, nickname, MAX_NICKNAME_LEN, is_admin)?;
    let id = PlayerId::generate();
    let next = seat(session, Participant::new(id, nickname, is_admin));
    Ok((next, id))
}

/// Seat a device's local identity, keeping its id, nickname, and balance.
///
/// The nickname is held to the identity's own length limit, which is looser
/// than the one for a typed-in seat.
///
/// # Errors
///
/// As [`add_player`], plus `TableError::PlayerAlreadySeated` when the
/// identity already has a seat.
pub fn add_identity(
    session: &Session,
    identity: &LocalIdentity,
    is_admin: bool,
) -> TableResult<(Session, PlayerId)> {
    if session.player(identity.id).is_some() {
        return Err(TableError::PlayerAlreadySeated(identity.id));
    }
    let nickname = check_seat(
        session,
        &identity.nickname,
        MAX_IDENTITY_NICKNAME_LEN,
        is_admin,
    )?;
    let mut participant = Participant::new(identity.id, nickname, is_admin);
    participant.balance = identity.balance;
    Ok((seat(session, participant), identity.id))
}

/// Remove a player. Removing the admin frees the admin slot.
///
/// # Errors
///
/// * `TableError::PlayerNotFound` - No such player
pub fn remove_player(session: &Session, player_id: PlayerId) -> TableResult<Session> {
    if session.player(player_id).is_none() {
        return Err(TableError::PlayerNotFound(player_id));
    }

    let mut next = session.clone();
    next.players.retain(|p| p.id != player_id);
    if next.admin_id == Some(player_id) {
        next.admin_id = None;
    }
    next.total_pot = next.sum_of_bets();
    Ok(next)
}

/// Give every player the initial balance and wipe all bets.
///
/// # Errors
///
/// Authorization failures only.
pub fn distribute_initial_balance(session: &Session, caller: PlayerId) -> TableResult<Session> {
    authorize(session, caller)?;

    let mut next = session.clone();
    for player in &mut next.players {
        player.balance = INITIAL_BALANCE;
        player.current_bet = 0;
    }
    next.total_pot = 0;
    next.round_active = false;
    Ok(next)
}

/// Add `amount` to every player's balance.
///
/// # Errors
///
/// * `TableError::InvalidAmount` - `amount` is zero, or would overflow a
///   balance
pub fn distribute_custom_amount(
    session: &Session,
    caller: PlayerId,
    amount: Chips,
) -> TableResult<Session> {
    authorize(session, caller)?;
    ensure_positive(amount)?;

    let mut next = session.clone();
    for player in &mut next.players {
        player.balance = credit(player.balance, amount)?;
    }
    Ok(next)
}

/// Add `amount` to one player's balance.
///
/// # Errors
///
/// * `TableError::InvalidAmount` - `amount` is zero, or would overflow the
///   balance
/// * `TableError::PlayerNotFound` - No such player
pub fn give_custom_amount_to_player(
    session: &Session,
    caller: PlayerId,
    player_id: PlayerId,
    amount: Chips,
) -> TableResult<Session> {
    authorize(session, caller)?;
    ensure_positive(amount)?;

    let mut next = session.clone();
    let player = next
        .player_mut(player_id)
        .ok_or(TableError::PlayerNotFound(player_id))?;
    player.balance = credit(player.balance, amount)?;
    Ok(next)
}

/// Move `amount` from a player's balance into their current bet.
///
/// # Errors
///
/// * `TableError::PlayerNotFound` - No such player
/// * `TableError::InsufficientFunds` - Balance is below `amount`
pub fn place_bet(session: &Session, player_id: PlayerId, amount: Chips) -> TableResult<Session> {
    let mut next = session.clone();
    let player = next
        .player_mut(player_id)
        .ok_or(TableError::PlayerNotFound(player_id))?;

    if player.balance < amount {
        return Err(TableError::InsufficientFunds {
            available: player.balance,
            required: amount,
        });
    }

    player.balance -= amount;
    player.current_bet = player.current_bet.saturating_add(amount);
    next.total_pot = next.sum_of_bets();
    Ok(next)
}

/// Start a new round: every bet and the pot go back to zero. Bets are not
/// refunded.
///
/// # Errors
///
/// Authorization failures only.
pub fn clear_all_bets(session: &Session, caller: PlayerId) -> TableResult<Session> {
    authorize(session, caller)?;

    let mut next = session.clone();
    clear_bets(&mut next);
    Ok(next)
}

/// Pay the whole pot to `winner_id` and close the round.
///
/// Returns the next snapshot together with the amount paid.
///
/// # Errors
///
/// * `TableError::PlayerNotFound` - No such winner
/// * `TableError::EmptyPot` - Nothing to pay out
/// * `TableError::InvalidAmount` - The pot would overflow the winner's
///   balance
pub fn distribute_winnings(
    session: &Session,
    caller: PlayerId,
    winner_id: PlayerId,
) -> TableResult<(Session, Chips)> {
    authorize(session, caller)?;

    let pot = session.total_pot;
    let mut next = session.clone();
    let winner = next
        .player_mut(winner_id)
        .ok_or(TableError::PlayerNotFound(winner_id))?;
    if pot == 0 {
        return Err(TableError::EmptyPot);
    }

    winner.balance = credit(winner.balance, pot)?;
    clear_bets(&mut next);
    Ok((next, pot))
}

/// Close the table. Anyone may close a table without an admin; otherwise
/// only the admin may.
///
/// # Errors
///
/// * `TableError::NotAdmin` - An admin exists and the caller is not it
/// * `TableError::AdminRequired` - An admin exists and no caller was given
pub fn exit_lobby(session: &Session, caller: Option<PlayerId>) -> TableResult<Session> {
    match (session.admin_id, caller) {
        (None, _) => {}
        (Some(admin), Some(caller)) if admin == caller => {}
        (Some(_), Some(caller)) => return Err(TableError::NotAdmin(caller)),
        (Some(_), None) => return Err(TableError::AdminRequired),
    }
    Ok(Session::empty())
}

/// Reject unless `caller` is the table admin.
///
/// # Errors
///
/// * `TableError::AdminNotSet` - Nobody is admin
/// * `TableError::NotAdmin` - Someone else is admin
pub fn authorize(session: &Session, caller: PlayerId) -> TableResult<()> {
    match session.admin_id {
        None => Err(TableError::AdminNotSet),
        Some(admin) if admin == caller => Ok(()),
        Some(_) => Err(TableError::NotAdmin(caller)),
    }
}

fn check_seat(
    session: &Session,
    nickname: &str,
    max_len: usize,
    is_admin: bool,
) -> TableResult<String> {
    if session.is_full() {
        return Err(TableError::CapacityReached {
            max: session.max_players,
        });
    }

    let nickname = normalize_nickname(nickname, max_len)
        .ok_or_else(|| TableError::InvalidNickname(nickname.trim().to_string()))?;

    let lowered = nickname.to_lowercase();
    if session
        .players
        .iter()
        .any(|p| p.nickname.to_lowercase() == lowered)
    {
        return Err(TableError::NicknameTaken(nickname));
    }

    if is_admin && session.admin_id.is_some() {
        return Err(TableError::AdminAlreadySet);
    }

    Ok(nickname)
}

fn seat(session: &Session, participant: Participant) -> Session {
    let mut next = session.clone();
    if participant.is_admin {
        next.admin_id = Some(participant.id);
    }
    next.players.push(participant);
    next
}

fn clear_bets(session: &mut Session) {
    for player in &mut session.players {
        player.current_bet = 0;
    }
    session.total_pot = 0;
    session.round_active = false;
}

fn credit(balance: Chips, amount: Chips) -> TableResult<Chips> {
    balance
        .checked_add(amount)
        .ok_or(TableError::InvalidAmount(amount))
}

fn ensure_positive(amount: Chips) -> TableResult<()> {
    if amount == 0 {
        return Err(TableError::InvalidAmount(amount));
    }
    Ok(())
}
