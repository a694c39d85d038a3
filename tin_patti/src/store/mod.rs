//! Durable storage for the shared session.
//!
//! This module implements:
//! - A [`Storage`] trait over one raw record with compare-and-swap writes
//! - File and in-memory backends
//! - [`SessionStore`], which loads with silent recovery and saves with
//!   optimistic concurrency control on the session version

pub mod errors;
pub mod manager;
pub mod storage;

pub use errors::{StoreError, StoreResult};
pub use manager::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage};
