//! Dispatcher service.

pub mod dispatcher;

pub use dispatcher::{CancelHandle, Dispatcher, PendingCall};
