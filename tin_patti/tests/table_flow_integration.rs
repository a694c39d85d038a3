//! Integration tests for table flows through the table service.
//!
//! Covers full betting rounds, capacity limits, admin removal, table
//! closing, and optimistic concurrency between two services sharing one
//! record.

use tin_patti::session::view;
use tin_patti::store::{MemoryStorage, SessionStore, StoreError};
use tin_patti::{INITIAL_BALANCE, MAX_PLAYERS, Session, TableError, TableService};

fn open(storage: &MemoryStorage) -> TableService<MemoryStorage> {
    TableService::open(SessionStore::new(storage.clone()))
}

#[test]
fn test_full_round_pays_winner() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);

    let alice = table.add_player("Alice", true).expect("seat alice");
    let bob = table.add_player("Bob", false).expect("seat bob");

    table.distribute_initial_balance(alice).expect("fund");
    for player in &table.session().players {
        assert_eq!(player.balance, INITIAL_BALANCE);
    }

    table.place_bet(bob, 20).expect("bob bets");
    let bob_seat = table.session().player(bob).expect("bob seated");
    assert_eq!(bob_seat.balance, 980);
    assert_eq!(bob_seat.current_bet, 20);
    assert_eq!(table.session().total_pot, 20);

    let paid = table.distribute_winnings(alice, bob).expect("payout");
    assert_eq!(paid, 20);
    let bob_seat = table.session().player(bob).expect("bob seated");
    assert_eq!(bob_seat.balance, 1000);
    assert_eq!(bob_seat.current_bet, 0);
    assert_eq!(table.session().total_pot, 0);

    // The persisted copy matches what the service holds.
    assert_eq!(&SessionStore::new(storage).load(), table.session());
}

#[test]
fn test_sixth_player_is_turned_away() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);
    for name in ["Ann", "Ben", "Cat", "Dan", "Eve"] {
        table.add_player(name, false).expect("seat");
    }
    let before = table.session().clone();

    let result = table.add_player("Sixth", false);
    assert!(matches!(
        result,
        Err(TableError::CapacityReached { max: MAX_PLAYERS })
    ));
    assert_eq!(table.session().players.len(), MAX_PLAYERS);
    assert_eq!(table.session(), &before);
    assert_eq!(view::open_seats(table.session()), 0);
}

#[test]
fn test_removing_admin_frees_slot_and_recomputes_pot() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);
    let alice = table.add_player("Alice", true).expect("seat");
    let bob = table.add_player("Bob", false).expect("seat");
    let carol = table.add_player("Carol", false).expect("seat");
    table.distribute_initial_balance(alice).expect("fund");

    table.place_bet(alice, 50).expect("bet");
    table.place_bet(bob, 15).expect("bet");
    table.place_bet(carol, 5).expect("bet");
    assert_eq!(table.session().total_pot, 70);

    table.remove_player(alice).expect("remove admin");
    assert!(!table.is_admin_set());
    assert!(table.current_admin().is_none());
    assert_eq!(table.session().total_pot, 20);

    // A new admin can now be seated.
    let dave = table.add_player("Dave", true).expect("seat new admin");
    assert_eq!(table.current_admin().map(|p| p.id), Some(dave));
}

#[test]
fn test_non_admin_cannot_pay_out() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);
    let alice = table.add_player("Alice", true).expect("seat");
    let bob = table.add_player("Bob", false).expect("seat");
    table.distribute_initial_balance(alice).expect("fund");
    table.place_bet(bob, 100).expect("bet");
    let before = table.session().clone();

    let result = table.distribute_winnings(bob, bob);
    assert!(matches!(result, Err(TableError::NotAdmin(id)) if id == bob));
    assert_eq!(table.session(), &before);
}

#[test]
fn test_failed_bet_reports_insufficient_funds() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);
    let alice = table.add_player("Alice", true).expect("seat");
    table.distribute_custom_amount(alice, 10).expect("grant");
    let before = table.session().clone();

    let result = table.place_bet(alice, 11);
    assert!(matches!(
        result,
        Err(TableError::InsufficientFunds {
            available: 10,
            required: 11
        })
    ));
    assert_eq!(table.session(), &before);
}

#[test]
fn test_exit_lobby_always_empties_table() {
    let storage = MemoryStorage::new();
    let mut table = open(&storage);
    let alice = table.add_player("Alice", true).expect("seat");
    let bob = table.add_player("Bob", false).expect("seat");
    table.distribute_initial_balance(alice).expect("fund");
    table.place_bet(bob, 300).expect("bet");

    table.exit_lobby(Some(alice)).expect("exit");

    let session = table.session();
    assert!(session.players.is_empty());
    assert_eq!(session.total_pot, 0);
    assert!(!session.round_active);
    assert!(session.admin_id.is_none());
    assert_eq!(session, &Session::empty());

    let reloaded = SessionStore::new(storage.clone()).load();
    assert_eq!(reloaded, Session::empty());
    assert!(open(&storage).session().is_empty());
}

#[test]
fn test_stale_writer_is_rejected_then_retries() {
    let storage = MemoryStorage::new();
    let mut first = open(&storage);
    let mut second = open(&storage);

    let alice = first.add_player("Alice", true).expect("first seats alice");

    // `second` still holds the empty v0 snapshot.
    let result = second.add_player("Bob", false);
    assert!(matches!(
        result,
        Err(TableError::Store(StoreError::VersionConflict {
            expected: 0,
            found: 1
        }))
    ));

    // The conflict reloaded the fresh snapshot; the retry lands on top of it.
    assert_eq!(second.session().players.len(), 1);
    let bob = second.add_player("Bob", false).expect("retry succeeds");

    first.refresh();
    let session = first.session();
    assert!(session.player(alice).is_some());
    assert!(session.player(bob).is_some());
    assert_eq!(session.version, 2);
}

#[test]
fn test_exit_lobby_invalidates_other_writers() {
    let storage = MemoryStorage::new();
    let mut admin_view = open(&storage);
    let alice = admin_view.add_player("Alice", true).expect("seat");
    let bob = admin_view.add_player("Bob", false).expect("seat");
    admin_view.distribute_initial_balance(alice).expect("fund");

    let mut player_view = open(&storage);
    admin_view.exit_lobby(Some(alice)).expect("exit");

    let result = player_view.place_bet(bob, 10);
    assert!(matches!(
        result,
        Err(TableError::Store(StoreError::VersionConflict { .. }))
    ));
    assert!(player_view.session().is_empty());
}

#[test]
fn test_writer_from_closed_table_cannot_overwrite_reopened_table() {
    let storage = MemoryStorage::new();
    let mut admin_view = open(&storage);
    let alice = admin_view.add_player("Alice", true).expect("seat");
    let bob = admin_view.add_player("Bob", false).expect("seat");
    admin_view.distribute_initial_balance(alice).expect("fund");

    let mut player_view = open(&storage);
    assert_eq!(player_view.session().version, 3);

    // Close and reopen until the new table is back at the same version.
    admin_view.exit_lobby(Some(alice)).expect("exit");
    let zed = admin_view.add_player("Zed", true).expect("seat");
    admin_view.add_player("Yan", false).expect("seat");
    admin_view.distribute_initial_balance(zed).expect("fund");
    assert_eq!(admin_view.session().version, 3);

    let result = player_view.place_bet(bob, 10);
    assert!(matches!(
        result,
        Err(TableError::Store(StoreError::VersionConflict {
            expected: 3,
            found: 3
        }))
    ));

    let stored = SessionStore::new(storage).load();
    let names: Vec<&str> = stored.players.iter().map(|p| p.nickname.as_str()).collect();
    assert_eq!(names, ["Zed", "Yan"]);
    assert_eq!(player_view.session(), &stored);
}
