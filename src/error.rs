use std::error::Error as _;
use std::time::Duration;

use serde::Serialize;

/// Error type returned by this crate.
///
/// `Display` is the user-facing message: a UI can render `err.to_string()`
/// directly.
#[derive(Debug, thiserror::Error)]
pub enum DocQaError {
    /// Local pre-request check failed (e.g. bad upload type or size).
    /// Never sent to the backend.
    #[error("{0}")]
    Validation(String),
    /// The request deadline elapsed before a response arrived.
    #[error("request timed out after {} ms", timeout.as_millis())]
    Timeout { timeout: Duration },
    /// Non-success HTTP status with the normalized backend message.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Connection-level failure from `reqwest`.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// Malformed body on an otherwise successful response.
    #[error("parse error: {0}")]
    Parse(String),
    /// Client configuration could not be built.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DocQaError {
    /// HTTP status code, when the error came from a non-2xx response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Uniform `{message, http_status?, cause?}` shape handed to a UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&DocQaError> for NormalizedError {
    fn from(err: &DocQaError) -> Self {
        Self {
            message: err.to_string(),
            http_status: err.http_status(),
            cause: err.source().map(|source| source.to_string()),
        }
    }
}

impl From<DocQaError> for NormalizedError {
    fn from(err: DocQaError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DocQaError, NormalizedError};

    #[test]
    fn http_error_displays_backend_message_only() {
        let err = DocQaError::Http {
            status: 404,
            message: "not found".to_owned(),
        };
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.http_status(), Some(404));
    }

    #[test]
    fn normalized_timeout_has_no_status_or_cause() {
        let err = DocQaError::Timeout {
            timeout: Duration::from_millis(1_500),
        };
        let normalized = NormalizedError::from(&err);
        assert_eq!(normalized.message, "request timed out after 1500 ms");
        assert_eq!(normalized.http_status, None);
        assert_eq!(normalized.cause, None);
    }

    #[test]
    fn normalized_error_serializes_without_empty_fields() {
        let normalized = NormalizedError::from(DocQaError::Validation("too big".to_owned()));
        let json = serde_json::to_value(&normalized).expect("must serialize");
        assert_eq!(json, serde_json::json!({ "message": "too big" }));
    }
}
