//! Outbound ports for the bridge.

use async_trait::async_trait;
use url::Url;

/// Executable-fetch primitive behind an attached script node.
///
/// `Ok` carries the script body, which the dispatcher then evaluates. `Err`
/// is the node's error event: the remote never got a chance to answer.
#[async_trait]
pub trait ScriptTransport: Send + Sync {
    /// Fetch the script addressed by `src`
    async fn fetch(&self, src: &Url) -> Result<String, TransportError>;
}

/// Script delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("failed to read script body: {0}")]
    Body(String),
}
