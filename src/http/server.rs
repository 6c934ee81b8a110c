//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router from the route table
//! - Wire up middleware (tracing, limits, request ID, identity injection)
//! - Run the per-request pipeline: gate → build call → dispatch → relay
//! - Bind server to listener with graceful shutdown

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodFilter, MethodRouter},
    Router,
};
use serde_json::Map;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::dao::{DaoClient, DownstreamCall};
use crate::http::health::get_status;
use crate::http::request::{decode_body, request_id, InboundRequest, MakeRequestUuid};
use crate::http::response::{relay, GatewayError};
use crate::http::views::render_shell;
use crate::observability::metrics;
use crate::routing::{Operation, RouteAction, RouteDescriptor, RouteTable};
use crate::security::headers::with_security_headers;
use crate::security::{inject_identity, AuthGate, Identity, IdentityState, SessionStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dao: Arc<dyn DaoClient>,
    pub gate: AuthGate,
    pub max_body_size: usize,
}

/// HTTP server for the tournament gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(
        config: GatewayConfig,
        routes: &RouteTable,
        dao: Arc<dyn DaoClient>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let state = AppState {
            dao,
            gate: AuthGate::new(config.auth.login_path.clone()),
            max_body_size: config.security.max_body_size,
        };
        let identity = IdentityState {
            sessions,
            cookie_name: Arc::from(config.auth.session_cookie.as_str()),
        };

        let router = Self::build_router(&config, routes, state, identity);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GatewayConfig,
        routes: &RouteTable,
        state: AppState,
        identity: IdentityState,
    ) -> Router {
        // Methods sharing a path go into one MethodRouter.
        let mut by_path: BTreeMap<String, MethodRouter<AppState>> = BTreeMap::new();
        for route in routes.iter() {
            let Ok(filter) = MethodFilter::try_from(route.method.clone()) else {
                tracing::error!(route = %route.name, method = %route.method, "Unsupported method, route skipped");
                continue;
            };

            let descriptor = route.clone();
            let handler = move |State(state): State<AppState>, request: Request<Body>| {
                let descriptor = descriptor.clone();
                async move { handle_route(state, descriptor, request).await }
            };

            let path = route.pattern.as_str().to_string();
            let method_router = by_path.remove(&path).unwrap_or_else(MethodRouter::new);
            by_path.insert(path, method_router.on(filter, handler));
        }

        let mut router = Router::new().route("/healthz", get(get_status));
        for (path, method_router) in by_path {
            router = router.route(&path, method_router);
        }

        let router = router
            .with_state(state)
            .layer(middleware::from_fn_with_state(identity, inject_identity))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        if config.security.enable_headers {
            with_security_headers(router)
        } else {
            router
        }
    }

    /// The assembled router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            dao = %self.config.dao.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Handler shared by every route in the table.
async fn handle_route(
    state: AppState,
    route: Arc<RouteDescriptor>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let response = process(&state, &route, request).await;
    metrics::record_request(
        &route.name,
        route.method.as_str(),
        response.status().as_u16(),
        start_time,
    );
    response
}

async fn process(state: &AppState, route: &RouteDescriptor, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let Some(params) = route.pattern.capture(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut inbound = InboundRequest {
        method: parts.method.clone(),
        path,
        params,
        body: Map::new(),
        identity: parts.extensions.get::<Identity>().cloned(),
        request_id: request_id(&parts.headers),
    };

    tracing::debug!(
        request_id = inbound.request_id.as_deref().unwrap_or("unknown"),
        route = %route.name,
        method = %inbound.method,
        path = %inbound.path,
        "Handling request"
    );

    let caller = match state
        .gate
        .authenticate(route, &inbound.path, inbound.identity.take())
    {
        Ok(caller) => caller,
        Err(rejection) => return rejection.into_response(),
    };

    let dao_route = match &route.action {
        RouteAction::Shell(view) => return render_shell(view, &inbound.params).into_response(),
        RouteAction::Dao(dao_route) => dao_route,
    };

    if dao_route.operation == Operation::Write {
        let bytes = match axum::body::to_bytes(body, state.max_body_size).await {
            Ok(bytes) => bytes,
            Err(_) => return GatewayError::PayloadTooLarge(state.max_body_size).into_response(),
        };
        inbound.body = match decode_body(&parts.headers, &bytes) {
            Ok(fields) => fields,
            Err(e) => return GatewayError::from(e).into_response(),
        };
    }

    let call = match DownstreamCall::build(dao_route, &inbound.params, &inbound.body, caller) {
        Ok(call) => call.with_request_id(inbound.request_id.clone()),
        Err(e) => {
            tracing::warn!(route = %route.name, error = %e, "Rejected path parameter");
            return GatewayError::from(e).into_response();
        }
    };

    tracing::info!(
        request_id = inbound.request_id.as_deref().unwrap_or("unknown"),
        route = %route.name,
        dao_target = %call.target,
        "Forwarding to DAO"
    );

    let result = state.dao.dispatch(call).await;
    metrics::record_dao_call(&route.name, &result);
    relay(dao_route, result)
}
