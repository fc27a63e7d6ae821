//! Request logging utilities for upstream chat calls
//!
//! Gives every chat request a short correlation id and a consistent set of
//! structured fields across the token, invoke and translate stages.

use std::time::Instant;
use tracing::{debug, error, info, Span};
use uuid::Uuid;

/// Context for tracking a chat request through the pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Short identifier for log correlation
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: String,
    /// Model requested by the caller
    pub requested_model: String,
    /// Model sent upstream after mapping
    pub model: String,
    /// Whether the caller asked for a chunk stream
    pub streaming: bool,
}

impl RequestContext {
    pub fn new(upstream: &str, requested_model: &str, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
            start_time: Instant::now(),
            upstream: upstream.to_string(),
            requested_model: requested_model.to_string(),
            model: model.to_string(),
            streaming: false,
        }
    }

    /// Mark this as a streaming request
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_request_start(&self, message_count: usize) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            requested_model = %self.requested_model,
            model = %self.model,
            streaming = %self.streaming,
            message_count = message_count,
            "Chat request started"
        );
    }

    pub fn log_token_acquired(&self) {
        debug!(
            trace_id = %self.trace_id,
            elapsed_ms = %self.elapsed_ms(),
            "Session token acquired"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    pub fn log_stream_started(&self) {
        info!(
            trace_id = %self.trace_id,
            model = %self.model,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response started"
        );
    }

    pub fn log_stream_ended(&self, chunks: usize) {
        info!(
            trace_id = %self.trace_id,
            model = %self.model,
            chunks = chunks,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    /// Log a stream dropped before the upstream finished
    pub fn log_client_disconnected(&self, chunks: usize) {
        debug!(
            trace_id = %self.trace_id,
            model = %self.model,
            chunks = chunks,
            elapsed_ms = %self.elapsed_ms(),
            "Client disconnected before stream completed"
        );
    }

    pub fn log_request_complete(&self, content_len: usize) {
        info!(
            trace_id = %self.trace_id,
            model = %self.model,
            streaming = %self.streaming,
            content_len = content_len,
            elapsed_ms = %self.elapsed_ms(),
            "Chat request completed"
        );
    }

    /// Log request failure
    pub fn log_error(&self, stage: &str, error: &str) {
        error!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            model = %self.model,
            streaming = %self.streaming,
            stage = %stage,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Chat request failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "chat_request",
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            model = %self.model,
            streaming = %self.streaming,
        )
    }
}
