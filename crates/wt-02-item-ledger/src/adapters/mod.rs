//! Adapters.

pub mod demo_sheet;

pub use demo_sheet::DemoSheet;
