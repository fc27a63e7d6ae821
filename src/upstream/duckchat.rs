//! DuckDuckGo duckchat client
//!
//! Implements both upstream stages: the status handshake that issues an
//! `x-vqd-4` session token, and the chat call that returns the line-oriented
//! event body.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::translate::UpstreamChatRequest;

use super::headers::{self, TOKEN_HEADER};
use super::provider::{ChatUpstream, InvokeError, SessionToken, TokenError, UpstreamResponse};
use super::retry::RetryPolicy;

const STATUS_PATH: &str = "/duckchat/v1/status";
const CHAT_PATH: &str = "/duckchat/v1/chat";

/// Client for the duckchat endpoints
pub struct DuckChatClient {
    client: reqwest::Client,
    status_url: String,
    chat_url: String,
    base_headers: HeaderMap,
    token_timeout: Duration,
    chat_timeout: Duration,
    retry: RetryPolicy,
}

impl DuckChatClient {
    /// Create a new client sharing the given connection pool
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            status_url: format!("{}{}", config.upstream_base_url, STATUS_PATH),
            chat_url: format!("{}{}", config.upstream_base_url, CHAT_PATH),
            base_headers: headers::impersonation_headers(),
            token_timeout: config.token_timeout,
            chat_timeout: config.chat_timeout,
            retry: config.retry_policy(),
        }
    }

    async fn request_token(&self) -> Result<SessionToken, TokenError> {
        let response = self
            .client
            .get(&self.status_url)
            .headers(headers::token_request_headers())
            .timeout(self.token_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Status { status, body });
        }

        response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(SessionToken::new)
            .ok_or(TokenError::MissingHeader)
    }

    async fn send_chat(
        &self,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, InvokeError> {
        // The timeout set here also bounds reads of the streamed body.
        let response = self
            .client
            .post(&self.chat_url)
            .headers(headers)
            .body(body)
            .timeout(self.chat_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::Status { status, body });
        }

        Ok(UpstreamResponse {
            status,
            body: response.bytes_stream().boxed(),
        })
    }
}

#[async_trait]
impl ChatUpstream for DuckChatClient {
    fn name(&self) -> &'static str {
        "duckchat"
    }

    #[instrument(skip(self), fields(url = %self.status_url))]
    async fn acquire_token(&self) -> Result<SessionToken, TokenError> {
        self.retry.run("token", || self.request_token()).await
    }

    #[instrument(skip(self, body, token), fields(url = %self.chat_url, model = %body.model))]
    async fn invoke(
        &self,
        body: &UpstreamChatRequest,
        token: &SessionToken,
    ) -> Result<UpstreamResponse, InvokeError> {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let headers = headers::chat_request_headers(&self.base_headers, token)
            .map_err(|_| InvokeError::InvalidToken)?;

        debug!(body_len = payload.len(), "Sending chat request upstream");

        // Single attempt: the token is spent once the upstream has seen it
        self.send_chat(headers, payload).await
    }
}
