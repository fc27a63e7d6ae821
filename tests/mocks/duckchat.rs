//! Mock DuckDuckGo duckchat upstream for testing
//!
//! Provides wiremock-based mocks for the two duckchat endpoints:
//! - GET /duckchat/v1/status - Session token handshake (`x-vqd-4` header)
//! - POST /duckchat/v1/chat - Chat call returning `data: ` event lines
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::duckchat::{DuckChatTestData, MockDuckChat};
//!
//! #[tokio::test]
//! async fn test_with_duckchat_mock() {
//!     let mock = MockDuckChat::start().await;
//!     mock.mock_token("T").await;
//!     mock.mock_chat_events(&DuckChatTestData::event_body(&["Hi", " there"])).await;
//!
//!     // Use mock.uri() as UPSTREAM_BASE_URL
//! }
//! ```

#![allow(dead_code)]

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const STATUS_PATH: &str = "/duckchat/v1/status";
pub const CHAT_PATH: &str = "/duckchat/v1/chat";
pub const TOKEN_HEADER: &str = "x-vqd-4";

/// Mock duckchat server wrapper
pub struct MockDuckChat {
    server: MockServer,
}

impl MockDuckChat {
    /// Start a new mock duckchat server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    // =========================================================================
    // GET /duckchat/v1/status - Token handshake
    // =========================================================================

    /// Issue `token` to every handshake that asks for one
    pub async fn mock_token(&self, token: &str) {
        Mock::given(method("GET"))
            .and(path(STATUS_PATH))
            .and(header("x-vqd-accept", "1"))
            .respond_with(ResponseTemplate::new(200).insert_header(TOKEN_HEADER, token))
            .mount(&self.server)
            .await;
    }

    /// Answer the handshake with a non-2xx status
    pub async fn mock_token_status(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer the handshake with 200 but no token header
    pub async fn mock_token_missing_header(&self) {
        Mock::given(method("GET"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Fail the first `failures` handshakes with `status`, then issue `token`
    pub async fn mock_token_after_failures(&self, failures: u64, status: u16, token: &str) {
        Mock::given(method("GET"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(failures)
            .mount(&self.server)
            .await;
        self.mock_token(token).await;
    }

    /// Issue each token once, in order
    pub async fn mock_token_sequence(&self, tokens: &[&str]) {
        for token in tokens {
            Mock::given(method("GET"))
                .and(path(STATUS_PATH))
                .and(header("x-vqd-accept", "1"))
                .respond_with(ResponseTemplate::new(200).insert_header(TOKEN_HEADER, *token))
                .up_to_n_times(1)
                .mount(&self.server)
                .await;
        }
    }

    // =========================================================================
    // POST /duckchat/v1/chat - Chat call
    // =========================================================================

    /// Answer chat calls with a raw event body
    pub async fn mock_chat_events(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer chat calls with a non-2xx status
    pub async fn mock_chat_status(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Fail the first `failures` chat calls with `status`, then answer with `body`
    pub async fn mock_chat_after_failures(&self, failures: u64, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(failures)
            .mount(&self.server)
            .await;
        self.mock_chat_events(body).await;
    }

    // =========================================================================
    // Request capture
    // =========================================================================

    async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .collect()
    }

    pub async fn token_requests(&self) -> Vec<Request> {
        self.requests_to(STATUS_PATH).await
    }

    pub async fn chat_requests(&self) -> Vec<Request> {
        self.requests_to(CHAT_PATH).await
    }

    /// Session tokens carried by the chat calls, in arrival order
    pub async fn tokens_sent(&self) -> Vec<String> {
        self.chat_requests()
            .await
            .iter()
            .filter_map(|request| request.headers.get(TOKEN_HEADER))
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Every request the mock has seen, on either endpoint
    pub async fn total_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Factory helpers for duckchat event bodies
pub struct DuckChatTestData;

impl DuckChatTestData {
    /// One `data: ` line carrying a message fragment
    pub fn event_line(message: &str) -> String {
        format!("data: {}\n", json!({ "message": message }))
    }

    pub fn done_line() -> &'static str {
        "data: [DONE]\n"
    }

    /// Event lines for each fragment, without a terminating sentinel
    pub fn event_body(messages: &[&str]) -> String {
        messages.iter().map(|m| Self::event_line(m)).collect()
    }

    /// Event lines for each fragment, terminated by `[DONE]`
    pub fn event_body_with_done(messages: &[&str]) -> String {
        let mut body = Self::event_body(messages);
        body.push_str(Self::done_line());
        body
    }

    /// Fragments `a` and `b` with an undecodable line between them
    pub fn noisy_body() -> String {
        format!(
            "{}not an event\n{}{}",
            Self::event_line("a"),
            Self::event_line("b"),
            Self::done_line()
        )
    }

    /// Two fragments followed by an unparsable payload and a null message
    pub fn malformed_tail_body() -> &'static str {
        "data: {\"message\":\"a\"}\n\
         data: {\"message\":\"b\"}\n\
         data: notjson\n\
         data: {\"message\":null}\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_token_handshake() {
        let mock = MockDuckChat::start().await;
        mock.mock_token("4-abc").await;

        let response = reqwest::Client::new()
            .get(format!("{}{}", mock.uri(), STATUS_PATH))
            .header("x-vqd-accept", "1")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get(TOKEN_HEADER).unwrap(), "4-abc");
        assert_eq!(mock.token_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_token_after_failures() {
        let mock = MockDuckChat::start().await;
        mock.mock_token_after_failures(2, 503, "4-late").await;

        let client = reqwest::Client::new();
        let url = format!("{}{}", mock.uri(), STATUS_PATH);

        for _ in 0..2 {
            let response = client.get(&url).header("x-vqd-accept", "1").send().await.unwrap();
            assert_eq!(response.status(), 503);
        }
        let response = client.get(&url).header("x-vqd-accept", "1").send().await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_mock_chat_events() {
        let mock = MockDuckChat::start().await;
        mock.mock_chat_events(&DuckChatTestData::event_body_with_done(&["Hi"]))
            .await;

        let body = reqwest::Client::new()
            .post(format!("{}{}", mock.uri(), CHAT_PATH))
            .json(&json!({"model": "gpt-4o-mini", "messages": []}))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body, "data: {\"message\":\"Hi\"}\ndata: [DONE]\n");
        assert_eq!(mock.chat_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_token_sequence_issues_each_token_once() {
        let mock = MockDuckChat::start().await;
        mock.mock_token_sequence(&["4-first", "4-second"]).await;

        let client = reqwest::Client::new();
        let url = format!("{}{}", mock.uri(), STATUS_PATH);
        let mut issued = Vec::new();
        for _ in 0..2 {
            let response = client.get(&url).header("x-vqd-accept", "1").send().await.unwrap();
            issued.push(response.headers()[TOKEN_HEADER].to_str().unwrap().to_string());
        }

        assert_eq!(issued, vec!["4-first", "4-second"]);
    }

    #[test]
    fn test_malformed_tail_body_layout() {
        let body = DuckChatTestData::malformed_tail_body();
        assert_eq!(body.lines().count(), 4);
        assert!(body.lines().all(|line| line.starts_with("data: ")));
    }

    #[test]
    fn test_noisy_body_layout() {
        let body = DuckChatTestData::noisy_body();
        assert_eq!(body.lines().count(), 4);
        assert!(body.ends_with("data: [DONE]\n"));
    }
}
