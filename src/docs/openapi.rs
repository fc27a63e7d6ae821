//! OpenAPI specification for the OpenAI-compatible surface

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    error::{ErrorBody, ErrorResponse},
    routes::models::{Model, ModelsResponse},
    translate::{
        request::ChatCompletionRequest,
        response::{
            AssistantMessage, ChatCompletion, ChatCompletionChunk, ChunkChoice, ChunkDelta,
            CompletionChoice, Usage,
        },
        InboundMessage,
    },
};

/// OpenAPI specification for Duckbridge
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Duckbridge API",
        version = "1.0.0",
        description = "OpenAI-compatible chat completions backed by DuckDuckGo duckchat"
    ),
    paths(
        crate::routes::chat::chat_completions,
        crate::routes::models::list_models,
    ),
    components(
        schemas(
            // Request
            InboundMessage,
            ChatCompletionRequest,
            // Response
            ChunkDelta,
            ChunkChoice,
            ChatCompletionChunk,
            AssistantMessage,
            CompletionChoice,
            Usage,
            ChatCompletion,
            Model,
            ModelsResponse,
            // Error
            ErrorBody,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Chat", description = "Chat completion endpoints"),
        (name = "Models", description = "Model listing")
    )
)]
pub struct ApiDoc;

/// Security scheme addon for the optional bearer API key
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
