//! Access Control.
//!
//! Two steps, applied in order:
//! - `inject_identity` middleware resolves a session token into an
//!   [`Identity`] request extension and never rejects.
//! - [`AuthGate::authenticate`] runs per route and rejects gated routes
//!   that arrive without an identity, before anything is sent downstream.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::routing::{RouteAction, RouteDescriptor};
use crate::security::session::{Identity, SessionStore};

/// State required for identity injection.
#[derive(Clone, Debug)]
pub struct IdentityState {
    pub sessions: Arc<dyn SessionStore>,
    pub cookie_name: Arc<str>,
}

pub async fn inject_identity(
    State(state): State<IdentityState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = session_token(req.headers(), &state.cookie_name)
        .and_then(|token| state.sessions.resolve(token));

    match identity {
        Some(identity) => {
            debug!(username = %identity.username, "Session resolved");
            req.extensions_mut().insert(identity);
        }
        None => debug!("No session attached to request"),
    }

    next.run(req).await
}

/// Bearer token first, then the session cookie.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value)
}

/// Outcome of a gated route reached without a verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Send the browser to the login page.
    Redirect(String),
    Unauthorized,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Redirect(location) => Redirect::to(&location).into_response(),
            Rejection::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "authentication required" })),
            )
                .into_response(),
        }
    }
}

/// Per-route authentication gate.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    login_path: Option<String>,
}

impl AuthGate {
    pub fn new(login_path: Option<String>) -> Self {
        Self { login_path }
    }

    /// Returns the identity to forward: `None` on ungated routes, the
    /// caller on gated ones, or a rejection when a gated route has no caller.
    pub fn authenticate(
        &self,
        route: &RouteDescriptor,
        path: &str,
        identity: Option<Identity>,
    ) -> Result<Option<Identity>, Rejection> {
        if !route.auth_required {
            return Ok(None);
        }

        match identity {
            Some(identity) => Ok(Some(identity)),
            None => {
                warn!(route = %route.name, path = %path, "Rejected unauthenticated request");
                Err(self.reject(route, path))
            }
        }
    }

    fn reject(&self, route: &RouteDescriptor, path: &str) -> Rejection {
        match (&route.action, &self.login_path) {
            (RouteAction::Shell(_), Some(login)) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("next", path)
                    .finish();
                Rejection::Redirect(format!("{login}?{query}"))
            }
            _ => Rejection::Unauthorized,
        }
    }
}
