//! WT-02 Item Ledger - warranty items over the JSONP bridge.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐     ┌────────────────────┐     ┌──────────────────┐
//! │     ItemLedger     │────→│    ItemGateway     │←────│   ItemService    │
//! │ list, form, errors │     │      (port)        │     │ (over Dispatcher)│
//! └────────────────────┘     └────────────────────┘     └────────┬─────────┘
//!                                                                │ JSONP
//!                                                       ┌────────┴─────────┐
//!                                                       │ remote sheet, or │
//!                                                       │ DemoSheet        │
//!                                                       └──────────────────┘
//! ```
//!
//! The ledger never surfaces an error to its caller: failed operations are
//! logged and their message is kept in [`ItemLedger::error`]. Form validation
//! problems are reported per field in [`ItemLedger::form_errors`] and never
//! reach the remote.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::DemoSheet;
pub use domain::{
    expiring_within, FieldErrors, FormField, Item, ItemForm, NewItem, DEFAULT_WARRANTY_PERIOD,
    EXPIRY_WINDOW_DAYS,
};
pub use ports::{Clock, FixedClock, ItemGateway, SystemClock};
pub use service::{ItemLedger, ItemService};
