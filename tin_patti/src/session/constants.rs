//! Fixed table parameters.

use super::models::Chips;

/// Identifier of the one shared table.
pub const TABLE_ID: &str = "shared-table";

/// Seats at the table.
pub const MAX_PLAYERS: usize = 5;

/// Balance every player receives from an initial distribution.
pub const INITIAL_BALANCE: Chips = 1000;

pub const MIN_NICKNAME_LEN: usize = 2;

/// Longest nickname accepted when seating a player.
pub const MAX_NICKNAME_LEN: usize = 15;

/// Longest nickname accepted for a device's local identity.
pub const MAX_IDENTITY_NICKNAME_LEN: usize = 20;
