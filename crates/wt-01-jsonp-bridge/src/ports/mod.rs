//! Ports: the seams between the dispatcher and the outside world.

pub mod outbound;

pub use outbound::{ScriptTransport, TransportError};
