//! Fragment stream translation
//!
//! Turns upstream text fragments into the caller's dialect: a lazily
//! produced SSE chunk stream, or one aggregated `chat.completion`.

use std::convert::Infallible;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::translate::{ChatCompletion, ChatCompletionChunk, CompletionMeta};
use crate::upstream::RequestContext;

/// Format a chunk as an SSE data event: `data: {json}\n\n`
pub fn format_sse_chunk(chunk: &ChatCompletionChunk) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_string(chunk)?;
    Ok(Bytes::from(format!("data: {}\n\n", json)))
}

/// Tracks emitted chunks and reports a stream dropped before it finished
struct StreamProgress {
    ctx: RequestContext,
    chunks: usize,
    finished: bool,
}

impl StreamProgress {
    fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            chunks: 0,
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.ctx.log_stream_ended(self.chunks);
    }
}

impl Drop for StreamProgress {
    fn drop(&mut self) {
        if !self.finished {
            self.ctx.log_client_disconnected(self.chunks);
        }
    }
}

/// Build the SSE response body for a fragment stream.
///
/// Each non-empty fragment becomes one chunk sharing `meta`. Frames are
/// produced on demand, so the upstream is read only as fast as the caller
/// consumes. No `[DONE]` frame is appended.
pub fn sse_stream<S>(
    fragments: S,
    meta: CompletionMeta,
    ctx: RequestContext,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send
where
    S: Stream<Item = String> + Send + 'static,
{
    async_stream::stream! {
        let mut progress = StreamProgress::new(ctx);
        futures::pin_mut!(fragments);

        while let Some(fragment) = fragments.next().await {
            if fragment.is_empty() {
                continue;
            }

            match format_sse_chunk(&ChatCompletionChunk::from_fragment(&meta, fragment)) {
                Ok(frame) => {
                    progress.chunks += 1;
                    yield Ok(frame);
                }
                Err(e) => progress.ctx.log_error("serialize", &e.to_string()),
            }
        }

        progress.finish();
    }
}

/// Drain a fragment stream into one completion
pub async fn collect_completion<S>(fragments: S, meta: &CompletionMeta) -> ChatCompletion
where
    S: Stream<Item = String>,
{
    let content: String = fragments.collect().await;
    ChatCompletion::from_content(meta, content)
}
