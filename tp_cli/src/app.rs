//! Runs parsed commands against a table and renders the result.

use std::fmt::Write as _;

use anyhow::{Result, anyhow, bail};
use log::{debug, warn};
use tin_patti::{
    INITIAL_BALANCE, IdentityStore, PlayerId, Session, Storage, TableError, TableService,
    TableSummary,
};

use crate::commands::Command;

/// One command-line invocation: the shared table plus this device's
/// identity.
pub struct App<S> {
    table: TableService<S>,
    identities: IdentityStore<S>,
}

impl<S: Storage> App<S> {
    pub fn new(table: TableService<S>, identities: IdentityStore<S>) -> Self {
        Self { table, identities }
    }

    pub fn table(&self) -> &TableService<S> {
        &self.table
    }

    /// Run `command` and return the text to print.
    ///
    /// After a command that moves chips, a seated local identity takes on
    /// its seat's balance.
    ///
    /// # Errors
    ///
    /// Returns an error with a user-facing message when the table rejects
    /// the command or the local identity is missing or seated when it must
    /// not be.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        debug!("Executing {command:?}");

        let moves_chips = matches!(
            command,
            Command::Seed { .. }
                | Command::Grant { .. }
                | Command::Bet { .. }
                | Command::Payout { .. }
        );
        let output = self.dispatch(command)?;
        if moves_chips {
            self.sync_identity();
        }
        Ok(output)
    }

    fn dispatch(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Status => Ok(render_table(self.table.session())),
            Command::Join { nickname, admin } => {
                let id = self.table.add_player(&nickname, admin).map_err(rejected)?;
                Ok(format!("Seated {} as {id}", nickname.trim()))
            }
            Command::Leave { player } => {
                self.table.remove_player(player).map_err(rejected)?;
                Ok(format!("Removed {player}"))
            }
            Command::Seed { caller } => {
                self.table
                    .distribute_initial_balance(caller)
                    .map_err(rejected)?;
                Ok(format!("Every player now has {INITIAL_BALANCE}"))
            }
            Command::Grant {
                caller,
                amount,
                to: None,
            } => {
                self.table
                    .distribute_custom_amount(caller, amount)
                    .map_err(rejected)?;
                Ok(format!("Gave {amount} to every player"))
            }
            Command::Grant {
                caller,
                amount,
                to: Some(player),
            } => {
                self.table
                    .give_custom_amount_to_player(caller, player, amount)
                    .map_err(rejected)?;
                Ok(format!("Gave {amount} to {}", self.nickname(player)))
            }
            Command::Bet { player, amount } => {
                self.table.place_bet(player, amount).map_err(rejected)?;
                Ok(format!(
                    "{} bet {amount}; pot is {}",
                    self.nickname(player),
                    self.table.session().total_pot
                ))
            }
            Command::Clear { caller } => {
                self.table.clear_all_bets(caller).map_err(rejected)?;
                Ok("Bets cleared for a new round".to_string())
            }
            Command::Payout { caller, winner } => {
                let paid = self
                    .table
                    .distribute_winnings(caller, winner)
                    .map_err(rejected)?;
                Ok(format!("{} wins {paid}", self.nickname(winner)))
            }
            Command::Exit { caller } => {
                self.table.exit_lobby(caller).map_err(rejected)?;
                Ok("Table closed".to_string())
            }
            Command::WhoAmI => Ok(match self.identities.load() {
                Some(me) => format!("{} ({}) balance {}", me.nickname, me.id, me.balance),
                None => "No local identity. Create one with 'identity NAME'".to_string(),
            }),
            Command::Identity { nickname } => {
                let me = self.identities.create(&nickname)?;
                Ok(format!("Created identity {} ({})", me.nickname, me.id))
            }
            Command::Sit { admin } => {
                let Some(me) = self.identities.load() else {
                    bail!("No local identity. Create one with 'identity NAME'");
                };
                self.table.add_identity(&me, admin).map_err(rejected)?;
                Ok(format!("Seated {} as {}", me.nickname, me.id))
            }
            Command::ResetBalance => {
                let Some(me) = self.identities.load() else {
                    bail!("No local identity. Create one with 'identity NAME'");
                };
                if self.table.session().player(me.id).is_some() {
                    bail!("Leave the table before resetting your balance");
                }
                let me = self.identities.reset_balance(&me)?;
                Ok(format!("{} balance reset to {}", me.nickname, me.balance))
            }
            Command::Forget => {
                self.identities.reset()?;
                Ok("Local identity removed".to_string())
            }
        }
    }

    // Copy the seat's balance into the local identity record.
    fn sync_identity(&self) {
        let Some(me) = self.identities.load() else {
            return;
        };
        let Some(seat) = self.table.session().player(me.id) else {
            return;
        };
        if seat.balance == me.balance {
            return;
        }
        match self.identities.update_balance(&me, seat.balance) {
            Ok(me) => debug!("Local identity balance now {}", me.balance),
            Err(e) => warn!("Failed to update local identity balance: {e}"),
        }
    }

    fn nickname(&self, player: PlayerId) -> String {
        self.table
            .session()
            .player(player)
            .map_or_else(|| player.to_string(), |p| p.nickname.clone())
    }
}

fn rejected(err: TableError) -> anyhow::Error {
    debug!("Table rejected command: {err}");
    anyhow!(err.client_message())
}

/// Summary line followed by one row per seat.
pub fn render_table(session: &Session) -> String {
    let mut out = TableSummary::from(session).to_string();
    for player in &session.players {
        let _ = write!(
            out,
            "\n  {:<15} balance {:>6}  bet {:>5}{}  {}",
            player.nickname,
            player.balance,
            player.current_bet,
            if player.is_admin { "  [admin]" } else { "" },
            player.id,
        );
    }
    if session.players.is_empty() {
        out.push_str("\n  (no players)");
    }
    out
}
