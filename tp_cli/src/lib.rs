//! Command parsing and execution for the tp_cli binary.
//!
//! Each invocation runs one command against the shared table record and
//! exits, so several terminals on one machine can play at the same table.

pub mod app;
pub mod commands;
