//! Per-device local identity.
//!
//! A device remembers its own participant (`{id, nickname, balance}`) under a
//! record separate from the shared session. The table only reads it when the
//! identity is seated via [`crate::table::TableService::add_identity`].

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{IdentityError, IdentityResult};
pub use manager::IdentityStore;
pub use models::LocalIdentity;
