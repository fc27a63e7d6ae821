//! Service status endpoints
//!
//! - `/` - Banner
//! - `/ping` - Liveness ping
//! - `/health` - Version and uptime

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Plain message response used by `/` and `/ping`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "duckbridge is running",
    })
}

pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse { message: "pong" })
}

/// Health check endpoint
///
/// Reports process health only; the upstream is not probed.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
