//! WT-01 JSONP Bridge - remote calls over injected script delivery.
//!
//! The remote endpoint only speaks JSONP: a call is a script URL, and the
//! answer is that script invoking a named global callback. This crate turns
//! that fire-and-forget primitive into awaitable calls with exactly-once
//! settlement.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     JSONP BRIDGE (wt-01)                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   CallDescriptor ──encode──→ <endpoint>?action=..&callback=<id>  │
//! │                                     │                            │
//! │  ┌──────────────────┐      ┌────────┴─────────┐                  │
//! │  │  Callback Table  │      │ Script Document  │                  │
//! │  │ id → oneshot tx  │      │ node → src, id   │                  │
//! │  └────────┬─────────┘      └────────┬─────────┘                  │
//! │           │                         │ attach                     │
//! │           │                ┌────────┴─────────┐                  │
//! │           │  invoke(id, …) │ ScriptTransport  │ fetch / error    │
//! │           └────────────────┤ + evaluate()     │                  │
//! │                            └──────────────────┘                  │
//! │   settle(): take entry → detach node → abort tasks → send        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Settlement
//!
//! Each call settles exactly once through one of: callback invocation,
//! transport failure, per-call timeout, or cancellation. Whatever path wins,
//! the callback entry and the script node are gone when the result is
//! delivered.
//!
//! # Usage
//!
//! ```ignore
//! use wt_01_jsonp_bridge::{Action, BridgeConfig, CallDescriptor, Dispatcher};
//!
//! let dispatcher = Dispatcher::with_http(BridgeConfig::from_env()?)?;
//! let items: Vec<serde_json::Value> = dispatcher
//!     .call(CallDescriptor::new(Action::Get))
//!     .await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::{HttpScriptTransport, ScriptReply, ScriptRequest, ScriptedTransport};
pub use domain::config::BridgeConfig;
pub use domain::correlation::CorrelationId;
pub use domain::descriptor::{Action, CallDescriptor};
pub use domain::envelope::RemoteEnvelope;
pub use domain::error::{CallResult, ConfigError, ErrorKind, RemoteCallError};
pub use domain::pending::StatsSnapshot;
pub use ports::{ScriptTransport, TransportError};
pub use service::{CancelHandle, Dispatcher, PendingCall};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
