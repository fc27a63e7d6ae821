//! HTTP routes for Duckbridge
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod chat;
pub mod docs;
pub mod health;
pub mod metrics;
pub mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{middleware::auth::api_key_middleware, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Only chat completions sit behind the API key gate
    let chat_routes = Router::new()
        .route("/v1/chat/completions", post(chat::chat_completions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    let api_routes = Router::new()
        .route("/v1/models", get(models::list_models))
        .merge(chat_routes);

    let api_routes = match state.config.api_prefix.as_str() {
        "" => api_routes,
        prefix => Router::new().nest(prefix, api_routes),
    };

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/ping", get(health::ping))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .merge(docs::create_docs_router());

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
