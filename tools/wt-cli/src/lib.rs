//! WT-CLI: Warranty Tracker command line.
//!
//! Drives an `ItemLedger` from the terminal. Every command prints its
//! result as pretty JSON on stdout; logs go to stderr.
//!
//! ```text
//! wt list
//! wt show 3
//! wt add --name Fridge --buy-date 2024-01-01 [--period 365]
//! wt edit 3 --period 730
//! wt expiring [--today 2024-06-01]
//! ```
//!
//! `--demo` swaps the remote sheet for an in-memory one seeded around today.

pub mod cli;
pub mod commands;

pub use cli::{Args, Command};
pub use commands::{build_ledger, execute};
