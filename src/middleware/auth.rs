//! Authentication middleware
//!
//! Optional static bearer key gate for the chat endpoint. When `APIKEY` is
//! not configured every request passes through.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::{error::AppError, AppState};

/// Extract the Authorization header and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Hash an API key so it can be compared and logged without exposing it
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// API key middleware
///
/// Rejects requests whose `Authorization` header is missing, not of the
/// `Bearer` form, or carries a key other than the configured one.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn api_key_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::MissingApiKey)?;

    let provided = auth_header
        .to_str()
        .ok()
        .and_then(extract_bearer_token)
        .ok_or(AppError::MalformedApiKey)?;

    let provided_hash = hash_api_key(provided);
    if provided_hash != hash_api_key(expected) {
        warn!(key_hash = %&provided_hash[..12], "Rejected request with invalid API key");
        return Err(AppError::InvalidApiKey);
    }

    debug!("API key accepted");
    Ok(next.run(request).await)
}
