//! # Tin Patti
//!
//! Session engine for a shared Tin Patti table played by up to five people
//! on one device. It tracks every participant's balance, current bet, and
//! admin role, and derives the table's pot.
//!
//! Dealing and hand evaluation are not part of this crate; the admin declares
//! the winner and the engine moves the chips.
//!
//! ## Architecture
//!
//! - [`session`]: the snapshot model, its invariants, pure mutators, and
//!   derived views
//! - [`store`]: persistence with silent recovery from corrupt records and
//!   version-checked saves
//! - [`table`]: [`TableService`], the explicit service object every caller
//!   goes through
//! - [`identity`]: the device's own participant record
//! - [`config`]: where records live on disk
//!
//! ## Example
//!
//! ```
//! use tin_patti::store::{MemoryStorage, SessionStore};
//! use tin_patti::TableService;
//!
//! let mut table = TableService::open(SessionStore::new(MemoryStorage::new()));
//! let alice = table.add_player("Alice", true).unwrap();
//! assert_eq!(table.current_admin().map(|p| p.id), Some(alice));
//! ```

pub mod config;
pub mod identity;
pub mod session;
pub mod store;
pub mod table;

pub use config::StorageConfig;
pub use identity::{IdentityStore, LocalIdentity};
pub use session::{
    Chips, Participant, PlayerId, Session, TableError, TableResult, TableSummary,
    constants::{self, INITIAL_BALANCE, MAX_PLAYERS},
};
pub use store::{FileStorage, MemoryStorage, SessionStore, Storage, StoreError};
pub use table::TableService;
