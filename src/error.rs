//! Error types for Duckbridge
//!
//! Request-terminal failures are collected in [`AppError`], which renders as a
//! single JSON error object. Upstream details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::upstream::{InvokeError, TokenError};

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API key not provided")]
    MissingApiKey,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to acquire upstream session token: {0}")]
    TokenAcquisition(#[from] TokenError),

    #[error("Upstream chat call failed: {0}")]
    UpstreamCall(#[from] InvokeError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "BAD_REQUEST")]
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingApiKey => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            AppError::MalformedApiKey => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string())
            }
            AppError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, "INVALID_API_KEY", self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::TokenAcquisition(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ACQUISITION_FAILED",
                "Unable to obtain an upstream session token".to_string(),
            ),
            AppError::UpstreamCall(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Upstream service error".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
