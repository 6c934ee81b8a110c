//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Decode inbound body fields (JSON object or urlencoded form)
//! - Collect everything the pipeline needs into an [`InboundRequest`]
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing, and forwarded to the DAO
//! - Body is only read for write routes
//! - Unknown content types yield no fields rather than an error

use axum::http::{header, HeaderMap, HeaderName, Method, Request};
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::PathParams;
use crate::security::Identity;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Reads the request id stamped by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("malformed JSON body: {0}")]
    Malformed(String),

    #[error("JSON body must be an object")]
    NotAnObject,
}

/// Decode body fields according to the content type.
pub fn decode_body(headers: &HeaderMap, bytes: &[u8]) -> Result<Map<String, Value>, BodyError> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .unwrap_or_default();

    match content_type.as_str() {
        "application/json" => {
            match serde_json::from_slice(bytes).map_err(|e| BodyError::Malformed(e.to_string()))? {
                Value::Object(map) => Ok(map),
                _ => Err(BodyError::NotAnObject),
            }
        }
        "application/x-www-form-urlencoded" => Ok(url::form_urlencoded::parse(bytes)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect()),
        _ => Ok(Map::new()),
    }
}

/// Per-request data, discarded once the response is sent.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub params: PathParams,
    pub body: Map<String, Value>,
    pub identity: Option<Identity>,
    pub request_id: Option<String>,
}
