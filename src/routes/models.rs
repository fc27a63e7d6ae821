//! Models endpoint
//!
//! Lists the model aliases the gateway accepts.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::translate::SUPPORTED_MODELS;

/// Model information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Model {
    #[schema(example = "claude-3-haiku")]
    pub id: String,
    pub object: String,
    pub created: i64,
    #[schema(example = "duckduckgo")]
    pub owned_by: String,
}

/// Models list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<Model>,
}

/// List available models
///
/// Returns the public aliases; each maps to a canonical upstream model.
#[utoipa::path(
    get,
    path = "/v1/models",
    tag = "Models",
    responses(
        (status = 200, description = "Available models", body = ModelsResponse)
    )
)]
pub async fn list_models() -> Json<ModelsResponse> {
    let created = chrono::Utc::now().timestamp();

    let data = SUPPORTED_MODELS
        .iter()
        .map(|(alias, _)| Model {
            id: alias.to_string(),
            object: "model".to_string(),
            created,
            owned_by: "duckduckgo".to_string(),
        })
        .collect();

    Json(ModelsResponse {
        object: "list".to_string(),
        data,
    })
}
