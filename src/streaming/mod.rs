//! Upstream stream decoding and translation
//!
//! The upstream answers with a line-oriented body of `data: ` events. This
//! module splits it into lines, decodes the events into text fragments and
//! turns the fragments into either an SSE chunk stream or one aggregated
//! completion.

pub mod events;
pub mod translator;

pub use events::{message_fragments, LineError, UpstreamEvent};
pub use translator::{collect_completion, format_sse_chunk, sse_stream};

/// Buffer for accumulating incomplete lines across chunk boundaries.
///
/// Body chunks do not align with line boundaries, and a chunk may end in the
/// middle of a multi-byte character. Bytes are held until a `\n` arrives and
/// only complete lines are decoded.
///
/// # Example
/// ```
/// use duckbridge::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
///
/// let lines1 = buffer.feed(b"data: {\"message\":\"hel");
/// assert!(lines1.is_empty());
///
/// let lines2 = buffer.feed(b"lo\"}\n");
/// assert_eq!(lines2, vec!["data: {\"message\":\"hello\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    incomplete: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self {
            incomplete: Vec::new(),
        }
    }

    /// Feed bytes into the buffer and return any complete lines.
    ///
    /// Lines are split on `\n`; a trailing `\r` is stripped and empty lines
    /// are dropped. Invalid UTF-8 is replaced rather than rejected.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.incomplete.extend_from_slice(bytes);

        let mut complete_lines = Vec::new();

        while let Some(newline_pos) = self.incomplete.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.incomplete.drain(..=newline_pos).collect();
            if let Some(line) = decode_line(&raw[..newline_pos]) {
                complete_lines.push(line);
            }
        }

        complete_lines
    }

    /// Check if there's any incomplete data remaining in the buffer.
    pub fn has_incomplete(&self) -> bool {
        !self.incomplete.is_empty()
    }

    /// Take the unterminated final line, if any, at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.incomplete);
        decode_line(&raw)
    }
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(raw).into_owned())
    }
}
