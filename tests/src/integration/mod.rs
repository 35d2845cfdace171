//! Integration flows.

pub mod bridge;
pub mod ledger;
