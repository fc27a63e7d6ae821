//! Common test utilities for Duckbridge
//!
//! Builds the real router against a mock duckchat upstream.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue};
use axum_test::{TestRequest, TestServer};
use duckbridge::{routes, AppState, Config};

use crate::mocks::MockDuckChat;

/// Test configuration constants
pub mod constants {
    /// API key used when the gate is enabled
    pub const TEST_API_KEY: &str = "sk-duckbridge-test";
    /// Session token issued by the mock upstream
    pub const TEST_SESSION_TOKEN: &str = "4-test-session-token";
}

/// Config pointing at the mock upstream with fast retries
pub fn test_config(upstream_uri: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        api_prefix: String::new(),
        api_key: None,
        upstream_base_url: upstream_uri.to_string(),
        token_timeout: Duration::from_secs(5),
        chat_timeout: Duration::from_secs(5),
        max_retry_count: 2,
        retry_delay: Duration::from_millis(1),
    }
}

/// Sample request bodies
pub mod test_data {
    use serde_json::{json, Value};

    pub fn chat_request(model: &str, content: &str) -> Value {
        json!({
            "model": model,
            "messages": [
                {"role": "user", "content": content}
            ]
        })
    }

    pub fn streaming_chat_request(model: &str, content: &str) -> Value {
        json!({
            "model": model,
            "messages": [
                {"role": "user", "content": content}
            ],
            "stream": true
        })
    }
}

/// Test harness wiring the real router to a mock duckchat server
///
/// # Example
///
/// ```ignore
/// let harness = TestHarness::new().await;
/// harness.duckchat.mock_token("T").await;
/// harness.duckchat.mock_chat_events(&DuckChatTestData::event_body(&["Hi"])).await;
///
/// let response = harness
///     .server
///     .post("/v1/chat/completions")
///     .json(&test_data::chat_request("gpt-4o-mini", "Hello"))
///     .await;
/// ```
pub struct TestHarness {
    pub server: TestServer,
    pub duckchat: MockDuckChat,
}

impl TestHarness {
    /// Harness with default settings: no API key, no prefix
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness with config adjustments applied before the router is built
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let duckchat = MockDuckChat::start().await;

        let mut config = test_config(&duckchat.uri());
        adjust(&mut config);

        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        let app = routes::create_router(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, duckchat }
    }

    /// Harness with the API key gate enabled
    pub async fn with_api_key() -> Self {
        Self::with_config(|config| {
            config.api_key = Some(constants::TEST_API_KEY.to_string());
        })
        .await
    }

    /// Mount a token and an event body on the mock upstream
    pub async fn mock_upstream(&self, event_body: &str) {
        self.duckchat.mock_token(constants::TEST_SESSION_TOKEN).await;
        self.duckchat.mock_chat_events(event_body).await;
    }
}

/// Attach an `Authorization` header to a test request
pub fn with_authorization(request: TestRequest, value: &str) -> TestRequest {
    request.add_header(
        header::AUTHORIZATION,
        HeaderValue::from_str(value).expect("invalid header value"),
    )
}

/// Split an SSE body into the JSON payloads of its `data: ` frames
pub fn sse_payloads(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .map(|json| serde_json::from_str(json).expect("frame is not JSON"))
        .collect()
}
