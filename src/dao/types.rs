//! DAO response types and error definitions.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Errors that keep a downstream call from producing a result.
#[derive(Debug, Error)]
pub enum DaoError {
    /// The call did not complete within the configured bound.
    #[error("DAO call timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or protocol failure.
    #[error("DAO transport error: {0}")]
    Transport(String),

    /// The outgoing request could not be assembled.
    #[error("invalid DAO request: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read DAO response body: {0}")]
    Body(String),

    #[error("failed to encode DAO payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for DAO calls.
pub type DaoResult<T> = Result<T, DaoError>;

/// A downstream body, kept byte-for-byte for verbatim relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoPayload {
    content_type: Option<HeaderValue>,
    bytes: Bytes,
}

impl DaoPayload {
    pub fn new(content_type: Option<HeaderValue>, bytes: Bytes) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    pub fn json(value: &Value) -> Self {
        Self {
            content_type: Some(HeaderValue::from_static("application/json")),
            bytes: Bytes::from(value.to_string()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: Some(HeaderValue::from_static("text/plain; charset=utf-8")),
            bytes: Bytes::from(text.into()),
        }
    }

    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The body as JSON; anything that is not JSON becomes a JSON string.
    pub fn to_value(&self) -> Value {
        serde_json::from_slice(&self.bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.bytes).into_owned()))
    }
}

/// A completed downstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoResponse {
    pub status: StatusCode,
    pub payload: DaoPayload,
}

impl DaoResponse {
    pub fn new(status: StatusCode, payload: DaoPayload) -> Self {
        Self { status, payload }
    }

    /// Any 2xx status counts as success.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_to_value() {
        let payload = DaoPayload::json(&json!({"name": "Spring Open"}));
        assert_eq!(payload.to_value(), json!({"name": "Spring Open"}));

        let payload = DaoPayload::text("duplicate");
        assert_eq!(payload.to_value(), json!("duplicate"));

        let payload = DaoPayload::new(None, Bytes::new());
        assert_eq!(payload.to_value(), json!(""));
    }

    #[test]
    fn test_success_range() {
        let ok = DaoResponse::new(StatusCode::CREATED, DaoPayload::text(""));
        assert!(ok.is_success());
        let redirect = DaoResponse::new(StatusCode::FOUND, DaoPayload::text(""));
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_error_display() {
        let err = DaoError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "DAO call timed out after 10s");
    }
}
