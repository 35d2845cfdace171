//! HTTP script transport.
//!
//! Fetches the script body with a plain GET, the same request a browser makes
//! for an injected `<script src>`. Any non-success status counts as a load
//! failure.

use crate::domain::config::BridgeConfig;
use crate::domain::error::ConfigError;
use crate::ports::outbound::{ScriptTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Script transport over `reqwest`.
pub struct HttpScriptTransport {
    client: Client,
}

impl HttpScriptTransport {
    /// Build a transport from bridge configuration.
    ///
    /// Only connecting is bounded here. The whole-call deadline belongs to the
    /// dispatcher's timer, which may be longer than `config.timeout` per call.
    pub fn new(config: &BridgeConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ScriptTransport for HttpScriptTransport {
    async fn fetch(&self, src: &Url) -> Result<String, TransportError> {
        let response = self
            .client
            .get(src.clone())
            .header(reqwest::header::ACCEPT, "application/javascript, */*;q=0.1")
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(status = status.as_u16(), bytes = body.len(), "Fetched script");
        Ok(body)
    }
}
