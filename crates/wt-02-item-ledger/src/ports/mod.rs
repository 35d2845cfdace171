//! Ports for the item ledger.

pub mod outbound;

pub use outbound::{Clock, FixedClock, ItemGateway, SystemClock};
