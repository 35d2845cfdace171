//! Item domain: entity, form rules, expiry window.

pub mod expiry;
pub mod form;
pub mod item;

pub use expiry::{expiring_within, EXPIRY_WINDOW_DAYS};
pub use form::{FieldErrors, FormField, ItemForm};
pub use item::{Item, NewItem, DEFAULT_WARRANTY_PERIOD};
