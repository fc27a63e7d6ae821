//! Configuration management for Duckbridge
//!
//! Configuration is loaded from environment variables once at startup and
//! handed to every component as an immutable value.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::upstream::retry::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Path prefix for the `/v1/*` routes, either empty or `/segment[/...]`
    pub api_prefix: String,
    /// Bearer key required on chat completions; `None` disables the check
    pub api_key: Option<String>,

    /// Base URL of the DuckDuckGo site hosting the duckchat endpoints
    pub upstream_base_url: String,
    /// Deadline for the session token handshake
    pub token_timeout: Duration,
    /// Deadline for the chat call, body reads included
    pub chat_timeout: Duration,

    /// Extra attempts after a failed upstream call
    pub max_retry_count: u32,
    /// Base delay between attempts, doubled on each retry
    pub retry_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .context("Invalid PORT")?,

            api_prefix: normalize_prefix(&env::var("API_PREFIX").unwrap_or_default()),
            api_key: env::var("APIKEY").ok().filter(|key| !key.is_empty()),

            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://duckduckgo.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            token_timeout: Duration::from_secs(
                env::var("TOKEN_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Invalid TOKEN_TIMEOUT_SECS")?,
            ),
            chat_timeout: Duration::from_secs(
                env::var("CHAT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid CHAT_TIMEOUT_SECS")?,
            ),

            max_retry_count: env::var("MAX_RETRY_COUNT")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid MAX_RETRY_COUNT")?,
            retry_delay: Duration::from_millis(
                env::var("RETRY_DELAY")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .context("Invalid RETRY_DELAY")?,
            ),
        })
    }

    /// Retry policy shared by the token handshake and the chat call
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retry_count, self.retry_delay)
    }
}

/// Normalize a route prefix to `""` or `/a/b` (leading slash, no trailing slash)
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
