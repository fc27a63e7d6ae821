//! Status endpoint integration tests
//!
//! Covers the unprefixed public routes:
//! - GET / and /ping
//! - GET /health
//! - GET /metrics
//! - GET /docs/openapi.json
//! - CORS preflight

use axum::http::{header, HeaderValue, Method, StatusCode};
use serde_json::Value;

use crate::common::TestHarness;

#[tokio::test]
async fn test_root_banner() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "duckbridge is running");
}

#[tokio::test]
async fn test_ping() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/ping").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_status_routes_ignore_prefix() {
    let harness = TestHarness::with_config(|config| config.api_prefix = "/hf".to_string()).await;

    assert_eq!(harness.server.get("/ping").await.status_code(), StatusCode::OK);
    assert_eq!(
        harness.server.get("/hf/ping").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_health_check() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_document() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let spec: Value = response.json();
    assert!(spec["info"]["title"].as_str().unwrap().contains("Duckbridge"));
    assert!(spec["paths"]["/v1/chat/completions"].is_object());
}

#[tokio::test]
async fn test_cors_preflight() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .method(Method::OPTIONS, "/v1/chat/completions")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://app.example"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
