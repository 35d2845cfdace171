//! Correlation ID for callback tracking.
//!
//! A correlation ID doubles as the name of the global callback the remote
//! script invokes, so it must be a valid script identifier. The random part is
//! a UUID v7 in simple (hex) form, which keeps IDs time-ordered in logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Namespace prefix used when none is configured.
pub const DEFAULT_CALLBACK_PREFIX: &str = "jsonp_callback_";

/// Correlation ID linking an outbound script request to its callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new correlation ID under `prefix`.
    ///
    /// The caller is responsible for passing a prefix accepted by
    /// [`is_script_identifier`]; the generated suffix is always hex.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}{}", prefix, Uuid::now_v7().simple()))
    }

    /// Parse a callback name received from a script body.
    pub fn parse(s: &str) -> Result<Self, InvalidCorrelationId> {
        if is_script_identifier(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidCorrelationId(s.to_string()))
        }
    }

    /// Get the callback name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A callback name that is not a valid script identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid callback identifier: {0:?}")]
pub struct InvalidCorrelationId(pub String);

/// Returns true when `s` matches `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_script_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
