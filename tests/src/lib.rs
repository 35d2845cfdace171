//! # Warranty Tracker Test Suite
//!
//! Cross-crate tests that run the dispatcher over its real HTTP transport.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Local JSONP server (axum, 127.0.0.1:0)
//! └── integration/
//!     ├── bridge.rs     # Settlement paths over HTTP
//!     └── ledger.rs     # Ledger flows against the demo sheet
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wt-tests
//! cargo test -p wt-tests integration::bridge::
//! ```

pub mod harness;
pub mod integration;
