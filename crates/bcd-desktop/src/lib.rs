//! bcd-desktop library root.
//!
//! Re-exports the terminal front end's modules so integration tests can
//! drive a session without a real terminal or native dialogs.

pub mod commands;
pub mod config;
pub mod state;
pub mod terminal;
