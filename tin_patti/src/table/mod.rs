//! Table service tying the session mutators to the session store.
//!
//! ## Example
//!
//! ```
//! use tin_patti::store::{MemoryStorage, SessionStore};
//! use tin_patti::table::TableService;
//!
//! let mut table = TableService::open(SessionStore::new(MemoryStorage::new()));
//! let alice = table.add_player("Alice", true).unwrap();
//! let bob = table.add_player("Bob", false).unwrap();
//!
//! table.distribute_initial_balance(alice).unwrap();
//! table.place_bet(bob, 20).unwrap();
//! assert_eq!(table.session().total_pot, 20);
//!
//! let paid = table.distribute_winnings(alice, bob).unwrap();
//! assert_eq!(paid, 20);
//! ```

pub mod service;

pub use service::TableService;
