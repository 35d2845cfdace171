//! Remote envelope returned through the callback.

use crate::domain::error::RemoteCallError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, data?, error? }` as passed to the callback.
///
/// `success` decides which of `data` and `error` is meaningful; the other one
/// is ignored even when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoteEnvelope {
    /// Successful envelope carrying `data`
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying `message`
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Decode the raw callback argument.
    pub fn from_payload(payload: Value) -> Result<Self, RemoteCallError> {
        serde_json::from_value(payload)
            .map_err(|e| RemoteCallError::Decode(format!("malformed envelope: {}", e)))
    }

    /// Resolve to `data` (JSON `null` when absent) or reject with `error`.
    pub fn into_result(self) -> Result<Value, RemoteCallError> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(RemoteCallError::application(self.error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ErrorKind, UNKNOWN_REMOTE_ERROR};
    use serde_json::json;

    #[test]
    fn test_success_yields_data() {
        let env = RemoteEnvelope::from_payload(json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(env.into_result().unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_success_without_data_is_null() {
        let env = RemoteEnvelope::from_payload(json!({"success": true})).unwrap();
        assert_eq!(env.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_failure_ignores_data() {
        let env = RemoteEnvelope::from_payload(
            json!({"success": false, "data": {"id": 1}, "error": "not found"}),
        )
        .unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn test_failure_without_message() {
        let err = RemoteEnvelope::from_payload(json!({"success": false}))
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_REMOTE_ERROR);
    }

    #[test]
    fn test_malformed_payload() {
        let err = RemoteEnvelope::from_payload(json!("oops")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
