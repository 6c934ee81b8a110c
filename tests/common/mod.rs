//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tournament_gateway::config::{GatewayConfig, SessionConfig};
use tournament_gateway::lifecycle::build_server;
use tournament_gateway::Shutdown;

/// A request as the mock DAO saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedCall {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

type ReplyFuture = Pin<Box<dyn Future<Output = (u16, String)> + Send>>;
type Reply = Arc<dyn Fn(RecordedCall) -> ReplyFuture + Send + Sync>;

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: Reply,
}

/// Handle to a running mock DAO service.
pub struct MockDao {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDao {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Start a programmable mock DAO. `f` picks the status and JSON-or-text body.
pub async fn start_mock_dao<F, Fut>(f: F) -> MockDao
where
    F: Fn(RecordedCall) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        calls: calls.clone(),
        reply: Arc::new(move |call| -> ReplyFuture { Box::pin(f(call)) }),
    };

    let app = Router::new()
        .route("/{*path}", any(record))
        .route("/", any(record))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDao { addr, calls }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let call = RecordedCall {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    };
    state.calls.lock().unwrap().push(call.clone());

    let (status, body) = (state.reply)(call).await;
    let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
        "application/json"
    } else {
        "text/plain"
    };
    (
        StatusCode::from_u16(status).unwrap(),
        [("content-type", content_type)],
        body,
    )
}

/// Gateway config pointed at `dao`, with sessions for alice and bob.
pub fn gateway_config(dao: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.dao.base_url = format!("http://{dao}");
    config.auth.sessions = vec![
        SessionConfig {
            token: "t-alice".into(),
            username: "alice".into(),
        },
        SessionConfig {
            token: "t-bob".into(),
            username: "bob".into(),
        },
    ];
    config
}

/// Start the gateway on an ephemeral port. Returns its base URL.
pub async fn start_gateway(config: GatewayConfig, shutdown: &Shutdown) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = build_server(config).unwrap();
    let stop = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    format!("http://{addr}")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
