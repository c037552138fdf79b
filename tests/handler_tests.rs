/// HTTP-layer tests for the apply endpoint's response contract.
/// Every failure, including bodies that never reach the dispatcher, must
/// come back as `{ok: false, error}` JSON, and transport faults must not
/// echo request internals to the caller.
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use lead_notify_api::config::Config;
use lead_notify_api::dispatcher::LeadDispatcher;
use lead_notify_api::handlers::{self, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(api_base: String) -> Router {
    let config = Config {
        port: 8080,
        telegram_bot_token: "SECRET-TOKEN".to_string(),
        telegram_chat_ids: vec!["111".to_string(), "222".to_string()],
        telegram_api_base: api_base,
    };
    let dispatcher = LeadDispatcher::new(&config).unwrap();
    let state = Arc::new(AppState { config, dispatcher });

    Router::new()
        .route("/api/telegram/apply", post(handlers::apply))
        .with_state(state)
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn malformed_json_body_gets_structured_error() {
    // Base URL is irrelevant: the request must be rejected before any call.
    let app = test_app("http://127.0.0.1:9".to_string());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telegram/apply")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json at all"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("invalid request body"));
}

#[tokio::test]
async fn missing_json_content_type_gets_structured_error() {
    let app = test_app("http://127.0.0.1:9".to_string());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telegram/apply")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn transport_failure_response_never_leaks_the_bot_token() {
    // Point the dispatcher at a freed local port so both the default and the
    // fallback attempt are refused during the probe.
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let app = test_app(format!("http://127.0.0.1:{}", closed_port));

    let payload = json!({
        "name": "Hong GilDong",
        "phone": "010-1234-5678",
        "bizType": "개인사업자",
        "amount": 10_000_000,
        "region": "Seoul"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/telegram/apply")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let raw = read_body(response).await;
    assert!(!raw.contains("SECRET-TOKEN"), "credential leaked: {}", raw);

    let body: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "network error");
}
