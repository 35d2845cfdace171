//! Bridge configuration with validation.

use crate::domain::correlation::{is_script_identifier, DEFAULT_CALLBACK_PREFIX};
use crate::domain::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Default settlement deadline for a single call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base endpoint every script URL is built on
    pub endpoint: Option<Url>,
    /// Per-call timeout unless overridden at dispatch
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Namespace prefix for callback names
    pub callback_prefix: String,
    /// User agent sent by the HTTP script transport
    pub user_agent: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            callback_prefix: DEFAULT_CALLBACK_PREFIX.to_string(),
            user_agent: format!("wt-jsonp-bridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BridgeConfig {
    /// Config pointing at `endpoint` with defaults elsewhere.
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            endpoint: Some(endpoint),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WT_ENDPOINT`: Remote endpoint URL (required before dispatching)
    /// - `WT_TIMEOUT`: Per-call timeout, humantime syntax (default: 30s)
    /// - `WT_CALLBACK_PREFIX`: Callback name prefix (default: jsonp_callback_)
    /// - `WT_USER_AGENT`: HTTP user agent
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("WT_ENDPOINT") {
            let url = Url::parse(raw.trim())
                .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
            config.endpoint = Some(url);
        }
        if let Some(raw) = lookup("WT_TIMEOUT") {
            config.timeout = humantime_serde::re::humantime::parse_duration(raw.trim())
                .map_err(|e| ConfigError::InvalidTimeout(format!("{}: {}", raw, e)))?;
        }
        if let Some(prefix) = lookup("WT_CALLBACK_PREFIX") {
            config.callback_prefix = prefix;
        }
        if let Some(agent) = lookup("WT_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint()?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint(format!(
                "unsupported scheme {:?}",
                endpoint.scheme()
            )));
        }
        if endpoint.fragment().is_some() {
            return Err(ConfigError::InvalidEndpoint(
                "endpoint must not carry a fragment".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("timeout cannot be 0".into()));
        }

        if !is_script_identifier(&self.callback_prefix) {
            return Err(ConfigError::InvalidCallbackPrefix(
                self.callback_prefix.clone(),
            ));
        }

        Ok(())
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> Result<&Url, ConfigError> {
        self.endpoint.as_ref().ok_or(ConfigError::MissingEndpoint)
    }
}
