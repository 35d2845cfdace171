//! # Warranty Tracker Telemetry
//!
//! Structured logging setup shared by the workspace binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wt_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full filter directive, wins over `WT_LOG_LEVEL` |
//! | `WT_LOG_LEVEL` | `info` | Log level filter |
//! | `WT_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `WT_CONSOLE_OUTPUT` | `true` | Write logs to stderr at all |
//! | `WT_SERVICE_NAME` | `warranty-tracker` | Service name attached to startup log |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Initialize logging for a binary.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Convenience macro for creating a span with subsystem context.
///
/// ```rust,ignore
/// let _span = wt_telemetry::subsystem_span!("fetch_items", subsystem = "ledger").entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
