//! Table service: the one mutation path for the shared session.

use log::{debug, error, info, warn};

use crate::identity::LocalIdentity;
use crate::session::{
    Chips, Participant, PlayerId, Session, TableError, TableResult, TableSummary, mutators, view,
};
use crate::store::{SessionStore, Storage, StoreError};

/// Owns the in-memory session snapshot and keeps it in sync with its store.
///
/// Every operation runs a pure mutator against the current snapshot. An
/// accepted transition is saved conditionally on the version this service
/// last read; only once the save succeeds does the service adopt the new
/// snapshot. A rejected operation leaves both the snapshot and the store
/// untouched.
pub struct TableService<S> {
    store: SessionStore<S>,
    session: Session,
}

impl<S: Storage> TableService<S> {
    /// Open the table, restoring whatever the store holds.
    pub fn open(store: SessionStore<S>) -> Self {
        let session = store.load();
        info!(
            "Opened table with {}/{} players (v{})",
            session.players.len(),
            session.max_players,
            session.version
        );
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Reload the snapshot from the store, picking up other writers' saves.
    pub fn refresh(&mut self) -> &Session {
        self.session = self.store.load();
        &self.session
    }

    pub fn current_admin(&self) -> Option<&Participant> {
        view::current_admin(&self.session)
    }

    pub fn is_admin_set(&self) -> bool {
        view::is_admin_set(&self.session)
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary::from(&self.session)
    }

    /// Seat a new player.
    ///
    /// # Returns
    ///
    /// * `TableResult<PlayerId>` - The new player's id, only if seated
    pub fn add_player(&mut self, nickname: &str, is_admin: bool) -> TableResult<PlayerId> {
        let id = self.apply("add_player", |s| mutators::add_player(s, nickname, is_admin))?;
        info!("Seated {} as {id}", nickname.trim());
        Ok(id)
    }

    /// Seat the device's local identity with its own id and balance.
    pub fn add_identity(
        &mut self,
        identity: &LocalIdentity,
        is_admin: bool,
    ) -> TableResult<PlayerId> {
        let id = self.apply("add_identity", |s| mutators::add_identity(s, identity, is_admin))?;
        info!("Seated local identity {} as {id}", identity.nickname);
        Ok(id)
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> TableResult<()> {
        self.apply("remove_player", |s| {
            mutators::remove_player(s, player_id).map(|next| (next, ()))
        })?;
        info!("Removed {player_id}");
        Ok(())
    }

    pub fn distribute_initial_balance(&mut self, caller: PlayerId) -> TableResult<()> {
        self.apply("distribute_initial_balance", |s| {
            mutators::distribute_initial_balance(s, caller).map(|next| (next, ()))
        })?;
        info!("Reset every balance to the initial amount");
        Ok(())
    }

    pub fn distribute_custom_amount(&mut self, caller: PlayerId, amount: Chips) -> TableResult<()> {
        self.apply("distribute_custom_amount", |s| {
            mutators::distribute_custom_amount(s, caller, amount).map(|next| (next, ()))
        })?;
        info!("Gave {amount} to every player");
        Ok(())
    }

    pub fn give_custom_amount_to_player(
        &mut self,
        caller: PlayerId,
        player_id: PlayerId,
        amount: Chips,
    ) -> TableResult<()> {
        self.apply("give_custom_amount_to_player", |s| {
            mutators::give_custom_amount_to_player(s, caller, player_id, amount)
                .map(|next| (next, ()))
        })?;
        info!("Gave {amount} to {player_id}");
        Ok(())
    }

    /// Place a bet for `player_id`.
    ///
    /// `Ok(())` means the bet was accepted; an error says why it was not
    /// (for example `TableError::InsufficientFunds`).
    pub fn place_bet(&mut self, player_id: PlayerId, amount: Chips) -> TableResult<()> {
        self.apply("place_bet", |s| {
            mutators::place_bet(s, player_id, amount).map(|next| (next, ()))
        })?;
        debug!("{player_id} bet {amount}, pot {}", self.session.total_pot);
        Ok(())
    }

    pub fn clear_all_bets(&mut self, caller: PlayerId) -> TableResult<()> {
        self.apply("clear_all_bets", |s| {
            mutators::clear_all_bets(s, caller).map(|next| (next, ()))
        })?;
        info!("Cleared all bets");
        Ok(())
    }

    /// Pay the pot to `winner_id`, returning the amount paid.
    pub fn distribute_winnings(
        &mut self,
        caller: PlayerId,
        winner_id: PlayerId,
    ) -> TableResult<Chips> {
        let paid = self.apply("distribute_winnings", |s| {
            mutators::distribute_winnings(s, caller, winner_id)
        })?;
        info!("Paid pot of {paid} to {winner_id}");
        Ok(paid)
    }

    /// Close the table and delete its persisted record.
    pub fn exit_lobby(&mut self, caller: Option<PlayerId>) -> TableResult<()> {
        let next = mutators::exit_lobby(&self.session, caller)
            .inspect_err(|e| debug!("exit_lobby rejected: {e}"))?;
        self.store.reset().inspect_err(|e| error!("Failed to delete session: {e}"))?;
        self.session = next;
        info!("Closed the table");
        Ok(())
    }

    fn apply<T>(
        &mut self,
        operation: &str,
        mutation: impl FnOnce(&Session) -> TableResult<(Session, T)>,
    ) -> TableResult<T> {
        let (next, output) = mutation(&self.session)
            .inspect_err(|e| debug!("{operation} rejected: {e}"))?;

        match self.store.save(&next) {
            Ok(saved) => {
                self.session = saved;
                Ok(output)
            }
            Err(e @ StoreError::VersionConflict { .. }) => {
                warn!("{operation} lost a write race ({e}); reloading");
                self.session = self.store.load();
                Err(TableError::Store(e))
            }
            Err(e) => {
                error!("{operation} could not be saved: {e}");
                Err(TableError::Store(e))
            }
        }
    }
}
