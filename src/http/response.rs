//! Response relay.
//!
//! # Responsibilities
//! - Turn a downstream result into the response for the original caller
//! - Map gateway-side failures to status codes with an `{error}` body
//!
//! # Relay Rules
//! - Success: per the route's [`SuccessRelay`]; reads answer 200, writes
//!   pass the downstream status through
//! - Write failure: always 400 with `{error: <downstream body>}`
//! - Read failure: downstream status and body, unchanged
//! - DAO timeout: 504; other transport failures: 502

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dao::{DaoError, DaoPayload, DaoResponse};
use crate::http::request::BodyError;
use crate::routing::{DaoRoute, Operation, SuccessRelay, TemplateError};

/// Failures raised by the gateway itself.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Body(#[from] BodyError),

    #[error(transparent)]
    Target(#[from] TemplateError),

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error(transparent)]
    Dao(#[from] DaoError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Body(_) | GatewayError::Target(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Dao(DaoError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Dao(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Relay a downstream result according to the route's policy.
pub fn relay(route: &DaoRoute, result: Result<DaoResponse, DaoError>) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "DAO call failed");
            return GatewayError::Dao(e).into_response();
        }
    };

    if response.is_success() {
        let status = match route.success {
            SuccessRelay::Passthrough => response.status,
            SuccessRelay::Status(status) => status,
        };
        return payload_response(status, response.payload);
    }

    match route.operation {
        Operation::Write => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": response.payload.to_value() })),
        )
            .into_response(),
        Operation::Read => payload_response(response.status, response.payload),
    }
}

/// Downstream body, byte for byte, under `status`.
fn payload_response(status: StatusCode, payload: DaoPayload) -> Response {
    let mut response = Response::new(Body::from(payload.bytes().clone()));
    *response.status_mut() = status;
    if let Some(content_type) = payload.content_type() {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    response
}
