//! Chat completions endpoint
//!
//! Translates an OpenAI-style request into a duckchat call and answers with
//! either an SSE chunk stream or one aggregated completion.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, Instrument};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    routes::metrics::{record_request, record_upstream_failure},
    streaming::{collect_completion, message_fragments, sse_stream},
    translate::{ChatCompletion, ChatCompletionRequest, CompletionMeta, UpstreamChatRequest},
    upstream::{ChatUpstream, ExchangeError, RequestContext, UpstreamResponse},
    AppState,
};

/// Handle chat completion requests
///
/// With `"stream": true` the response is `text/event-stream` carrying one
/// `chat.completion.chunk` per upstream fragment; otherwise a single
/// `chat.completion` JSON object.
#[utoipa::path(
    post,
    path = "/v1/chat/completions",
    tag = "Chat",
    request_body = ChatCompletionRequest,
    responses(
        (status = 200, description = "Completion, or a chunk stream when `stream` is true", body = ChatCompletion),
        (status = 400, description = "Request body is not valid JSON", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Upstream session token unavailable", body = ErrorResponse),
        (status = 502, description = "Upstream chat call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Response> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;

    let upstream_request = UpstreamChatRequest::from_inbound(&request);
    let ctx = RequestContext::new(
        state.upstream.name(),
        &request.model,
        &upstream_request.model,
    )
    .with_streaming(request.stream);

    let span = ctx.create_span();
    handle_chat(state, upstream_request, request.messages.len(), ctx)
        .instrument(span)
        .await
}

async fn handle_chat(
    state: Arc<AppState>,
    upstream_request: UpstreamChatRequest,
    message_count: usize,
    ctx: RequestContext,
) -> AppResult<Response> {
    let start_time = Instant::now();
    let model = upstream_request.model.clone();
    ctx.log_request_start(message_count);

    let upstream = state.upstream.as_ref();
    let request = &upstream_request;
    let log_ctx = &ctx;
    let exchange = state
        .config
        .retry_policy()
        .run("chat", move || open_exchange(upstream, request, log_ctx))
        .await;

    let upstream_response = match exchange {
        Ok(response) => response,
        Err(ExchangeError::Token(e)) => {
            ctx.log_error("token", &e.to_string());
            record_upstream_failure("token");
            record_request("token_error", &model, start_time.elapsed().as_secs_f64());
            return Err(e.into());
        }
        Err(ExchangeError::Invoke(e)) => {
            ctx.log_error("chat", &e.to_string());
            record_upstream_failure("chat");
            record_request("upstream_error", &model, start_time.elapsed().as_secs_f64());
            return Err(e.into());
        }
    };
    ctx.log_upstream_response(upstream_response.status.as_u16());

    let meta = CompletionMeta::new(model.clone());
    let fragments = message_fragments(upstream_response.body);

    let response = if ctx.streaming {
        ctx.log_stream_started();
        let body = Body::from_stream(sse_stream(fragments, meta, ctx.clone()));

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .header("X-Accel-Buffering", "no")
            .body(body)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))?
    } else {
        let completion = collect_completion(fragments, &meta).await;
        let content_len = completion
            .choices
            .first()
            .map(|choice| choice.message.content.len())
            .unwrap_or(0);
        ctx.log_request_complete(content_len);
        debug!(id = %completion.id, "Aggregated completion ready");

        Json(completion).into_response()
    };

    record_request("success", &model, start_time.elapsed().as_secs_f64());
    Ok(response)
}

/// One token-then-chat exchange; every attempt spends its own token
async fn open_exchange(
    upstream: &dyn ChatUpstream,
    request: &UpstreamChatRequest,
    ctx: &RequestContext,
) -> Result<UpstreamResponse, ExchangeError> {
    let token = upstream
        .acquire_token()
        .await
        .map_err(ExchangeError::Token)?;
    ctx.log_token_acquired();

    upstream
        .invoke(request, &token)
        .await
        .map_err(ExchangeError::Invoke)
}
