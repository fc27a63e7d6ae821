//! Upstream chat abstraction
//!
//! Defines the seam between the gateway and the upstream chat service, the
//! session token type, and the errors of both upstream stages.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reqwest::StatusCode;
use thiserror::Error;

use crate::translate::UpstreamChatRequest;

use super::retry::Retryable;

/// Stream type for the upstream's line-oriented response body
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Short-lived upstream credential, valid for a single chat call
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Live upstream chat response. Dropping it closes the connection.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: ByteStream,
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Failures of the session token handshake
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token request returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("token response is missing the session token header")]
    MissingHeader,
}

/// Failures of the chat invocation
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to serialize upstream request: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("session token is not a valid header value")]
    InvalidToken,

    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat request returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Failure of one token-then-chat exchange
///
/// Only chat failures are worth another exchange; token failures have
/// already been retried by `acquire_token`.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Token(TokenError),

    #[error(transparent)]
    Invoke(InvokeError),
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl Retryable for TokenError {
    fn is_retryable(&self) -> bool {
        match self {
            TokenError::Transport(_) => true,
            TokenError::Status { status, .. } => is_retryable_status(*status),
            TokenError::MissingHeader => false,
        }
    }
}

impl Retryable for InvokeError {
    fn is_retryable(&self) -> bool {
        match self {
            InvokeError::Transport(_) => true,
            InvokeError::Status { status, .. } => is_retryable_status(*status),
            InvokeError::Serialize(_) | InvokeError::InvalidToken => false,
        }
    }
}

impl Retryable for ExchangeError {
    fn is_retryable(&self) -> bool {
        match self {
            ExchangeError::Token(_) => false,
            ExchangeError::Invoke(e) => e.is_retryable(),
        }
    }
}

/// Trait defining the interface to the upstream chat service
///
/// The two stages run strictly in order and every token is consumed by
/// exactly one `invoke`. `invoke` makes a single attempt; a retried chat
/// call starts over with a fresh token.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Upstream name for logging and metrics
    fn name(&self) -> &'static str;

    /// Perform the handshake that yields a session token
    async fn acquire_token(&self) -> Result<SessionToken, TokenError>;

    /// Send the translated chat request and hand back the live response
    async fn invoke(
        &self,
        body: &UpstreamChatRequest,
        token: &SessionToken,
    ) -> Result<UpstreamResponse, InvokeError>;
}
