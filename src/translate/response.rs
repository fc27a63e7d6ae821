//! OpenAI-shaped response objects built from upstream text

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity shared by every object produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMeta {
    pub id: String,
    pub model: String,
    pub created: i64,
}

impl CompletionMeta {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: format!("chatcmpl-{}", Uuid::new_v4().simple()),
            model: model.into(),
            created: chrono::Utc::now().timestamp(),
        }
    }
}

/// Streaming chunk (`chat.completion.chunk`)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatCompletionChunk {
    pub id: String,
    #[schema(example = "chat.completion.chunk")]
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    /// Always `null`; the upstream does not report a stop reason
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChunkDelta {
    pub content: String,
}

impl ChatCompletionChunk {
    /// Wrap one upstream text fragment
    pub fn from_fragment(meta: &CompletionMeta, fragment: impl Into<String>) -> Self {
        Self {
            id: meta.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: meta.created,
            model: meta.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    content: fragment.into(),
                },
                finish_reason: None,
            }],
        }
    }
}

/// Aggregated non-streaming completion (`chat.completion`)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatCompletion {
    pub id: String,
    #[schema(example = "chat.completion")]
    pub object: String,
    pub created: i64,
    pub model: String,
    pub usage: Usage,
    pub choices: Vec<CompletionChoice>,
}

/// Token usage; the upstream reports none, so all counts are zero
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssistantMessage {
    #[schema(example = "assistant")]
    pub role: String,
    pub content: String,
}

impl ChatCompletion {
    pub fn from_content(meta: &CompletionMeta, content: String) -> Self {
        Self {
            id: meta.id.clone(),
            object: "chat.completion".to_string(),
            created: meta.created,
            model: meta.model.clone(),
            usage: Usage::default(),
            choices: vec![CompletionChoice {
                index: 0,
                message: AssistantMessage {
                    role: "assistant".to_string(),
                    content,
                },
            }],
        }
    }
}
