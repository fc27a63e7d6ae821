//! Upstream event decoding
//!
//! Each body line goes through three stages: [`data_payload`] picks out
//! `data: ` lines, [`decode_payload`] recognises the end sentinel or parses a
//! JSON object, and [`extract_message`] pulls the text fragment out of it.
//! A line that fails any stage is skipped; it never aborts the response.

use futures::{Stream, StreamExt};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::routes::metrics::{record_line_error, record_upstream_failure};
use crate::upstream::ByteStream;

use super::SseLineBuffer;

/// Prefix marking a line that carries an event payload
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the upstream body
pub const DONE_SENTINEL: &str = "[DONE]";

/// A decoded upstream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    Message(String),
    Done,
}

/// Reasons a `data: ` line yields no fragment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("payload is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("payload has no message field")]
    MissingMessage,

    #[error("message field is null")]
    NullMessage,

    #[error("message field is not a string")]
    NonStringMessage,
}

impl LineError {
    /// Metric label for this error
    pub fn kind(&self) -> &'static str {
        match self {
            LineError::InvalidJson(_) => "invalid_json",
            LineError::MissingMessage => "missing_message",
            LineError::NullMessage => "null_message",
            LineError::NonStringMessage => "non_string_message",
        }
    }
}

/// Decoded payload of a `data: ` line
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Done,
    Object(Map<String, Value>),
}

/// Strip the `data: ` prefix; any other line carries no event
pub fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

pub fn decode_payload(payload: &str) -> Result<Payload, LineError> {
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return Ok(Payload::Done);
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(object)) => Ok(Payload::Object(object)),
        Ok(other) => Err(LineError::InvalidJson(format!(
            "expected an object, found {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(LineError::InvalidJson(e.to_string())),
    }
}

pub fn extract_message(object: &Map<String, Value>) -> Result<String, LineError> {
    match object.get("message") {
        Some(Value::String(message)) => Ok(message.clone()),
        Some(Value::Null) => Err(LineError::NullMessage),
        Some(_) => Err(LineError::NonStringMessage),
        None => Err(LineError::MissingMessage),
    }
}

/// Run all three stages on one line. `None` means the line is not an event.
pub fn parse_line(line: &str) -> Option<Result<UpstreamEvent, LineError>> {
    let payload = data_payload(line)?;

    let event = decode_payload(payload).and_then(|decoded| match decoded {
        Payload::Done => Ok(UpstreamEvent::Done),
        Payload::Object(object) => extract_message(&object).map(UpstreamEvent::Message),
    });

    Some(event)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

enum LineOutcome {
    Fragment(String),
    Done,
    Skip,
}

fn handle_line(line: &str) -> LineOutcome {
    match parse_line(line) {
        None => LineOutcome::Skip,
        Some(Ok(UpstreamEvent::Message(fragment))) => LineOutcome::Fragment(fragment),
        Some(Ok(UpstreamEvent::Done)) => LineOutcome::Done,
        Some(Err(e)) => {
            // Metadata events carry no message
            if e == LineError::MissingMessage {
                debug!(line = %truncate(line), "Skipping event without message");
            } else {
                warn!(error = %e, line = %truncate(line), "Skipping undecodable upstream line");
            }
            record_line_error(e.kind());
            LineOutcome::Skip
        }
    }
}

fn truncate(line: &str) -> &str {
    match line.char_indices().nth(200) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Lazily decode an upstream body into text fragments, in arrival order.
///
/// The sequence ends at the `[DONE]` sentinel, at end of body, or at the
/// first read error. A final line without a terminating newline is still
/// decoded.
pub fn message_fragments(mut body: ByteStream) -> impl Stream<Item = String> + Send {
    async_stream::stream! {
        let mut buffer = SseLineBuffer::new();

        'read: loop {
            match body.next().await {
                Some(Ok(bytes)) => {
                    for line in buffer.feed(&bytes) {
                        match handle_line(&line) {
                            LineOutcome::Fragment(fragment) => yield fragment,
                            LineOutcome::Done => break 'read,
                            LineOutcome::Skip => {}
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Upstream body read failed, ending stream");
                    record_upstream_failure("read");
                    break;
                }
                None => {
                    if let Some(line) = buffer.finish() {
                        if let LineOutcome::Fragment(fragment) = handle_line(&line) {
                            yield fragment;
                        }
                    }
                    break;
                }
            }
        }
    }
}
