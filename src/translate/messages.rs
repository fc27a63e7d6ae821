//! Inbound message types and flattening
//!
//! The upstream accepts a single user turn, so the whole conversation is
//! collapsed into one text blob of `role:content;\r\n` records.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

/// A chat message as sent by an OpenAI-compatible client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InboundMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "user")]
    pub role: String,
    /// Plain text, an array of content parts, or any other JSON value
    #[serde(default)]
    #[schema(value_type = Object)]
    pub content: MessageContent,
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Message content in one of the shapes clients send
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
    Other(Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Other(Value::Null)
    }
}

/// One element of an array-form content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// Any object with a string `text` field; other fields are ignored
    Text { text: String },
    Other(Value),
}

impl MessageContent {
    /// Render the content as the text the upstream sees
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Other(_) => None,
                })
                .collect(),
            MessageContent::Other(Value::Null) => String::new(),
            MessageContent::Other(value) => value.to_string(),
        }
    }
}

/// Collapse a conversation into the single text blob the upstream expects.
///
/// `system` turns are re-labelled as `user`; every other role is kept.
pub fn flatten_messages(messages: &[InboundMessage]) -> String {
    let mut flattened = String::new();

    for message in messages {
        let role = match message.role.as_str() {
            "system" => "user",
            role => role,
        };
        flattened.push_str(role);
        flattened.push(':');
        flattened.push_str(&message.content.render());
        flattened.push_str(";\r\n");
    }

    flattened
}
