//! Translation between the OpenAI chat dialect and the duckchat dialect
//!
//! Inbound requests are reduced to a single flattened user turn with a
//! canonical upstream model name; upstream text fragments are wrapped back
//! into OpenAI-shaped completion objects.

pub mod messages;
pub mod model;
pub mod request;
pub mod response;

pub use messages::{flatten_messages, ContentPart, InboundMessage, MessageContent};
pub use model::{map_model, DEFAULT_MODEL, SUPPORTED_MODELS};
pub use request::{ChatCompletionRequest, UpstreamChatRequest, UpstreamMessage};
pub use response::{ChatCompletion, ChatCompletionChunk, CompletionMeta};
