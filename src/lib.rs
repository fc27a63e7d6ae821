//! Duckbridge - OpenAI-compatible gateway for DuckDuckGo duckchat
//!
//! Accepts OpenAI chat-completion requests, re-expresses them as duckchat
//! calls, and translates the upstream event body back into either an SSE
//! chunk stream or a single aggregated completion.

pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod streaming;
pub mod translate;
pub mod upstream;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::upstream::{ChatUpstream, DuckChatClient};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Upstream chat service
    pub upstream: Arc<dyn ChatUpstream>,
}

impl AppState {
    /// Create a new application state talking to the configured duckchat host
    pub fn new(config: Config) -> Result<Self> {
        // Per-call deadlines are set on each upstream request
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        let upstream: Arc<dyn ChatUpstream> =
            Arc::new(DuckChatClient::new(http_client, &config));

        Ok(Self::with_upstream(config, upstream))
    }

    /// Create an application state around an existing upstream implementation
    pub fn with_upstream(config: Config, upstream: Arc<dyn ChatUpstream>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            upstream,
        }
    }
}
