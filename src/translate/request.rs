//! Chat request types for both sides of the gateway

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::messages::{flatten_messages, null_as_default, InboundMessage};
use super::model::map_model;

/// OpenAI-compatible chat completion request
///
/// Only the fields the gateway acts on are modelled; anything else a client
/// sends (temperature, tools, ...) is accepted and ignored. Absent and `null`
/// fields both take their zero value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChatCompletionRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "claude-3-haiku")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<InboundMessage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stream: bool,
}

/// Request body for the duckchat chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamChatRequest {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

impl UpstreamChatRequest {
    /// Build the upstream body: canonical model plus one flattened user turn
    pub fn from_inbound(request: &ChatCompletionRequest) -> Self {
        Self {
            model: map_model(&request.model).to_string(),
            messages: vec![UpstreamMessage {
                role: "user".to_string(),
                content: flatten_messages(&request.messages),
            }],
        }
    }
}
