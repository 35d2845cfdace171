//! JSONP script evaluation.
//!
//! The only script shape the remote produces is a single call of a named
//! callback with one JSON argument:
//!
//! ```text
//! /**/ jsonp_callback_0190...( {"success":true,"data":[...]} );
//! ```
//!
//! Evaluating a body means extracting that callback name and argument. Anything
//! else is rejected rather than guessed at.

use crate::domain::correlation::is_script_identifier;
use serde_json::Value;

/// Parsed callback invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInvocation {
    pub callback: String,
    pub payload: Value,
}

/// Reasons a script body is not a callback invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("script body is empty")]
    Empty,
    #[error("script body is not a callback invocation")]
    NotAnInvocation,
    #[error("invalid callback name: {0:?}")]
    InvalidCallback(String),
    #[error("invalid callback argument: {0}")]
    Payload(String),
}

/// Extract the callback invocation from a script body.
pub fn evaluate(body: &str) -> Result<ScriptInvocation, ScriptError> {
    let mut src = body.trim();
    if let Some(rest) = src.strip_prefix("/**/") {
        src = rest.trim_start();
    }
    if let Some(rest) = src.strip_suffix(';') {
        src = rest.trim_end();
    }
    if src.is_empty() {
        return Err(ScriptError::Empty);
    }

    let (name, rest) = src.split_once('(').ok_or(ScriptError::NotAnInvocation)?;
    let name = name.trim();
    if !is_script_identifier(name) {
        return Err(ScriptError::InvalidCallback(name.to_string()));
    }

    let argument = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or(ScriptError::NotAnInvocation)?;
    let payload =
        serde_json::from_str(argument).map_err(|e| ScriptError::Payload(e.to_string()))?;

    Ok(ScriptInvocation {
        callback: name.to_string(),
        payload,
    })
}

/// Render the body a JSONP endpoint returns for `callback(payload)`.
pub fn render(callback: &str, payload: &Value) -> String {
    format!("{}({});", callback, payload)
}
