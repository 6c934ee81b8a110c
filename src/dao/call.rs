//! Downstream call construction.
//!
//! A [`DownstreamCall`] is built fresh for every request from the route's
//! declaration and the inbound request, and is not modified afterwards.
//! The payload holds exactly the declared fields: undeclared body fields are
//! dropped and a declared field missing from the body is sent as `null`.

use axum::http::Method;
use serde_json::{Map, Value};

use crate::routing::{DaoRoute, FieldSource, Operation, PathParams, TemplateError};
use crate::security::Identity;

/// A single call to the DAO service.
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamCall {
    pub method: Method,
    /// DAO resource path, e.g. `/tournament/cup-9/register`.
    pub target: String,
    /// `None` for reads.
    pub payload: Option<Map<String, Value>>,
    /// Caller forwarded for attribution; only set on gated routes.
    pub caller: Option<Identity>,
    pub request_id: Option<String>,
}

impl DownstreamCall {
    pub fn build(
        route: &DaoRoute,
        params: &PathParams,
        body: &Map<String, Value>,
        caller: Option<Identity>,
    ) -> Result<Self, TemplateError> {
        let target = route.target.resolve(params)?;

        let (method, payload) = match route.operation {
            Operation::Read => (Method::GET, None),
            Operation::Write => {
                let payload = route
                    .fields
                    .iter()
                    .map(|field| {
                        let value = match &field.source {
                            FieldSource::Body(name) => body.get(name).cloned(),
                            FieldSource::Username => caller
                                .as_ref()
                                .map(|identity| Value::String(identity.username.clone())),
                        };
                        (field.name.clone(), value.unwrap_or(Value::Null))
                    })
                    .collect();
                (Method::POST, Some(payload))
            }
        };

        Ok(Self {
            method,
            target,
            payload,
            caller,
            request_id: None,
        })
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
