//! Bridge error types.
//!
//! Every settled call that does not resolve carries a [`RemoteCallError`]. The
//! [`ErrorKind`] discriminant lets callers tell a remote rejection apart from a
//! delivery failure without matching on messages.

use std::time::Duration;

/// Message used when a transport failure leaves nothing better to report.
pub const TRANSPORT_FAILURE: &str = "network request failed";

/// Message used when a script loads but never calls back.
pub const CALLBACK_NOT_INVOKED: &str = "script loaded without invoking callback";

/// Message used when the remote rejects without saying why.
pub const UNKNOWN_REMOTE_ERROR: &str = "unknown remote error";

/// Discriminant of a [`RemoteCallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally before any network activity.
    InvalidRequest,
    /// The remote answered with `success: false`.
    Application,
    /// The script could not be delivered or did not call back.
    Transport,
    /// The per-call timer fired first.
    Timeout,
    /// The caller cancelled the call.
    Cancelled,
    /// The remote data did not match the expected type.
    Decode,
}

/// Failure of a single bridged call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteCallError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Application(String),

    #[error("{0}")]
    Transport(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("failed to decode remote data: {0}")]
    Decode(String),
}

impl RemoteCallError {
    /// Error kind for programmatic handling
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Application(_) => ErrorKind::Application,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Build an application error, falling back to a generic message when the
    /// remote supplied none.
    pub fn application(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => Self::Application(m),
            _ => Self::Application(UNKNOWN_REMOTE_ERROR.to_string()),
        }
    }

    /// Generic transport failure
    pub fn transport() -> Self {
        Self::Transport(TRANSPORT_FAILURE.to_string())
    }
}

impl From<serde_json::Error> for RemoteCallError {
    fn from(e: serde_json::Error) -> Self {
        RemoteCallError::Decode(e.to_string())
    }
}

/// Result type for bridged calls
pub type CallResult<T> = Result<T, RemoteCallError>;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("remote endpoint is not configured (set WT_ENDPOINT)")]
    MissingEndpoint,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid callback prefix: {0}")]
    InvalidCallbackPrefix(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_verbatim() {
        let err = RemoteCallError::application(Some("not found".into()));
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.kind(), ErrorKind::Application);
    }

    #[test]
    fn test_application_fallback() {
        assert_eq!(
            RemoteCallError::application(None).to_string(),
            UNKNOWN_REMOTE_ERROR
        );
        assert_eq!(
            RemoteCallError::application(Some("  ".into())).to_string(),
            UNKNOWN_REMOTE_ERROR
        );
    }

    #[test]
    fn test_transport_is_distinct_from_application() {
        let err = RemoteCallError::transport();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.to_string().is_empty());
        assert_ne!(err.kind(), RemoteCallError::application(None).kind());
    }

    #[test]
    fn test_timeout_display() {
        let err = RemoteCallError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "request timed out after 1500ms");
    }
}
