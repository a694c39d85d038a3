//! Shared table session: data model, transitions, and projections.
//!
//! This module provides:
//! - The persisted [`Session`] snapshot and its invariants
//! - Pure mutators producing the next snapshot from the current one
//! - Derived views (current admin, open seats, summary)

pub mod constants;
pub mod errors;
pub mod models;
pub mod mutators;
pub mod view;

pub use errors::{TableError, TableResult};
pub use models::{Chips, InvariantViolation, Participant, PlayerId, Session, normalize_nickname};
pub use view::{TableSummary, current_admin, is_admin_set};
