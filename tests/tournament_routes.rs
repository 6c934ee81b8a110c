//! End-to-end tests: real gateway, mock DAO service, reqwest client.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tournament_gateway::Shutdown;

mod common;

#[tokio::test]
async fn test_create_relays_success_unchanged() {
    let dao = common::start_mock_dao(|_| async { (201, "created".to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;

    let res = common::client()
        .post(format!("{gateway}/tournament/create"))
        .bearer_auth("t-alice")
        .json(&json!({ "name": "Spring Open", "date": "2024-04-01", "admin": true }))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await.unwrap(), "created");

    let calls = dao.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].path, "/tournament");
    assert_eq!(calls[0].headers["x-caller-username"], "alice");
    assert_eq!(
        calls[0].json(),
        json!({ "inputTournamentName": "Spring Open", "inputTournamentDate": "2024-04-01" })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_create_failure_normalized_to_400() {
    let dao = common::start_mock_dao(|_| async { (409, "duplicate".to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;

    let res = common::client()
        .post(format!("{gateway}/tournament/create"))
        .bearer_auth("t-alice")
        .form(&[("name", "Spring Open"), ("date", "2024-04-01")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "duplicate" }));

    // Form-encoded bodies are forwarded as JSON all the same.
    assert_eq!(
        dao.calls()[0].json(),
        json!({ "inputTournamentName": "Spring Open", "inputTournamentDate": "2024-04-01" })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_register_targets_registration_endpoint() {
    let dao = common::start_mock_dao(|_| async { (200, r#"{"entries":4}"#.to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;

    let res = common::client()
        .post(format!("{gateway}/tournament/cup-9"))
        .header("cookie", "session=t-bob")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "entries": 4 }));

    let calls = dao.calls();
    assert_eq!(calls[0].path, "/tournament/cup-9/register");
    assert_eq!(calls[0].json(), json!({ "inputUserName": "bob" }));
    assert_eq!(calls[0].headers["x-caller-username"], "bob");

    shutdown.trigger();
}

#[tokio::test]
async fn test_content_read_is_unauthenticated_and_verbatim() {
    let body = r#"{"name":"cup-9","date":"2024-04-01","rounds":3}"#;
    let dao = common::start_mock_dao(move |_| async move { (200, body.to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;

    let res = common::client()
        .get(format!("{gateway}/tournament/cup-9/content"))
        .bearer_auth("t-bob")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), body);

    let calls = dao.calls();
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].path, "/tournament/cup-9");
    assert!(calls[0].headers.get("x-caller-username").is_none());
    assert!(calls[0].body.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_list_and_read_failure_passthrough() {
    let dao = common::start_mock_dao(|call| async move {
        if call.path == "/tournament/" {
            (200, r#"["cup-9"]"#.to_string())
        } else {
            (404, "Unknown tournament".to_string())
        }
    })
    .await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;
    let client = common::client();

    let res = client
        .get(format!("{gateway}/tournaments/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!(["cup-9"]));

    let res = client
        .get(format!("{gateway}/tournament/ghost/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Unknown tournament");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unauthenticated_writes_never_reach_dao() {
    let dao = common::start_mock_dao(|_| async { (200, "{}".to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;
    let client = common::client();

    let res = client
        .post(format!("{gateway}/tournament/create"))
        .json(&json!({ "name": "Spring Open", "date": "2024-04-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{gateway}/tournament/cup-9"))
        .bearer_auth("t-revoked")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{gateway}/tournament/create"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/login?next=%2Ftournament%2Fcreate");

    assert!(dao.calls().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_dao_times_out_with_504() {
    let dao = common::start_mock_dao(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "{}".to_string())
    })
    .await;
    let mut config = common::gateway_config(dao.addr);
    config.dao.timeout_secs = 1;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(config, &shutdown).await;

    let res = common::client()
        .post(format!("{gateway}/tournament/cup-9"))
        .bearer_auth("t-bob")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    // Exactly one attempt: writes are never retried.
    assert_eq!(dao.calls().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_dao_is_502() {
    let unused = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = unused.local_addr().unwrap();
    drop(unused);

    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dead_addr), &shutdown).await;

    let res = common::client()
        .get(format!("{gateway}/tournaments/content"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shell_pages() {
    let dao = common::start_mock_dao(|_| async { (200, "{}".to_string()) }).await;
    let shutdown = Shutdown::new();
    let gateway = common::start_gateway(common::gateway_config(dao.addr), &shutdown).await;
    let client = common::client();

    let res = client.get(format!("{gateway}/tournaments")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("/tournamentList.js"));

    let res = client
        .get(format!("{gateway}/tournament/create"))
        .bearer_auth("t-alice")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Add a Tournament"));

    assert!(dao.calls().is_empty());
    shutdown.trigger();
}
