//! Domain types for the JSONP bridge.
//!
//! Pure state and encoding: no tasks are spawned and no I/O happens here.

pub mod config;
pub mod correlation;
pub mod descriptor;
pub mod document;
pub mod envelope;
pub mod error;
pub mod pending;

// Re-exports for convenience
pub use config::BridgeConfig;
pub use correlation::{CorrelationId, DEFAULT_CALLBACK_PREFIX};
pub use descriptor::{Action, CallDescriptor};
pub use document::{NodeId, ScriptDocument, ScriptNode};
pub use envelope::RemoteEnvelope;
pub use error::{CallResult, ConfigError, ErrorKind, RemoteCallError};
pub use pending::{CallbackTable, DispatchStats, StatsSnapshot};
