//! Ledger services.

pub mod item_service;
pub mod ledger;

pub use item_service::ItemService;
pub use ledger::ItemLedger;
