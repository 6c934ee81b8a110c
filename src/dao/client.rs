//! DAO service client with timeout and error handling.
//!
//! # Responsibilities
//! - Issue one downstream call per inbound request
//! - Forward caller identity and request id as headers
//! - Bound every call with the configured timeout
//!
//! # Design Decisions
//! - No retries: a failed write is never submitted twice
//! - The whole exchange (headers and body) shares one deadline
//! - The trait returns a boxed future so handlers hold `Arc<dyn DaoClient>`

use std::str::FromStr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Request, Uri};
use futures_util::future::BoxFuture;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time::timeout;
use url::Url;

use crate::config::DaoConfig;
use crate::dao::call::DownstreamCall;
use crate::dao::types::{DaoError, DaoPayload, DaoResponse, DaoResult};
use crate::http::X_REQUEST_ID;

/// Largest DAO response body the gateway will buffer.
const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

/// Issues downstream calls to the DAO service.
pub trait DaoClient: Send + Sync {
    fn dispatch(&self, call: DownstreamCall) -> BoxFuture<'_, DaoResult<DaoResponse>>;
}

/// DAO client speaking HTTP/JSON.
#[derive(Clone)]
pub struct HttpDaoClient {
    client: Client<HttpConnector, Body>,
    base_url: String,
    identity_header: HeaderName,
    timeout_duration: Duration,
}

impl HttpDaoClient {
    pub fn new(config: &DaoConfig) -> DaoResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| DaoError::Request(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        let identity_header = HeaderName::from_str(&config.identity_header)
            .map_err(|e| DaoError::Request(format!("invalid identity header: {}", e)))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            identity_header,
            timeout_duration: Duration::from_secs(config.timeout_secs),
        })
    }

    fn build_request(&self, call: &DownstreamCall) -> DaoResult<Request<Body>> {
        let uri = Uri::try_from(format!("{}{}", self.base_url, call.target))
            .map_err(|e| DaoError::Request(e.to_string()))?;

        let mut builder = Request::builder()
            .method(call.method.clone())
            .uri(uri)
            .header(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(caller) = &call.caller {
            builder = builder.header(self.identity_header.clone(), caller.username.as_str());
        }
        if let Some(request_id) = &call.request_id {
            builder = builder.header(X_REQUEST_ID, request_id.as_str());
        }

        let body = match &call.payload {
            Some(payload) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                Body::from(serde_json::to_vec(payload)?)
            }
            None => Body::empty(),
        };

        builder.body(body).map_err(|e| DaoError::Request(e.to_string()))
    }

    async fn exchange(&self, call: DownstreamCall) -> DaoResult<DaoResponse> {
        let request = self.build_request(&call)?;

        tracing::debug!(
            method = %call.method,
            dao_target = %call.target,
            caller = call.caller.as_ref().map(|c| c.username.as_str()),
            "Dispatching DAO call"
        );

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| DaoError::Transport(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| DaoError::Body(e.to_string()))?;

        let payload = DaoPayload::new(parts.headers.get(header::CONTENT_TYPE).cloned(), bytes);
        Ok(DaoResponse::new(parts.status, payload))
    }
}

impl DaoClient for HttpDaoClient {
    fn dispatch(&self, call: DownstreamCall) -> BoxFuture<'_, DaoResult<DaoResponse>> {
        Box::pin(async move {
            let target = call.target.clone();
            match timeout(self.timeout_duration, self.exchange(call)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(dao_target = %target, timeout = ?self.timeout_duration, "DAO call timed out");
                    Err(DaoError::Timeout(self.timeout_duration))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Identity;
    use axum::http::Method;
    use serde_json::{json, Map, Value};

    fn client(base_url: &str) -> HttpDaoClient {
        HttpDaoClient::new(&DaoConfig {
            base_url: base_url.to_string(),
            ..DaoConfig::default()
        })
        .unwrap()
    }

    fn write_call() -> DownstreamCall {
        let mut payload = Map::new();
        payload.insert("inputUserName".into(), Value::String("bob".into()));
        DownstreamCall {
            method: Method::POST,
            target: "/tournament/cup-9/register".into(),
            payload: Some(payload),
            caller: Some(Identity::new("bob")),
            request_id: Some("req-1".into()),
        }
    }

    #[tokio::test]
    async fn test_build_write_request() {
        let request = client("http://dao.internal:5000/").build_request(&write_call()).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.uri().to_string(),
            "http://dao.internal:5000/tournament/cup-9/register"
        );
        assert_eq!(request.headers()["x-caller-username"], "bob");
        assert_eq!(request.headers()[X_REQUEST_ID], "req-1");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");

        let body = axum::body::to_bytes(request.into_body(), 1024).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "inputUserName": "bob" }));
    }

    #[tokio::test]
    async fn test_build_read_request_has_no_identity() {
        let call = DownstreamCall {
            method: Method::GET,
            target: "/tournament/".into(),
            payload: None,
            caller: None,
            request_id: None,
        };
        let request = client("http://dao.internal:5000/api").build_request(&call).unwrap();

        assert_eq!(request.uri().to_string(), "http://dao.internal:5000/api/tournament/");
        assert!(request.headers().get("x-caller-username").is_none());
        assert!(request.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = HttpDaoClient::new(&DaoConfig {
            base_url: "not a url".into(),
            ..DaoConfig::default()
        });
        assert!(matches!(result, Err(DaoError::Request(_))));
    }

    #[tokio::test]
    async fn test_unreachable_dao_is_transport_error() {
        // Port 9 (discard) is not expected to be listening.
        let result = client("http://127.0.0.1:9").dispatch(write_call()).await;
        assert!(matches!(
            result,
            Err(DaoError::Transport(_)) | Err(DaoError::Timeout(_))
        ));
    }
}
