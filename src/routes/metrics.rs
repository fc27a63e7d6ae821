//! Prometheus metrics endpoint
//!
//! Exposes gateway metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "duckbridge_requests_total",
        "Total number of chat completion requests processed"
    );
    metrics::describe_histogram!(
        "duckbridge_request_duration_seconds",
        "Chat completion duration in seconds, until the response starts"
    );
    metrics::describe_counter!(
        "duckbridge_upstream_failures_total",
        "Upstream failures by stage (token, chat, read)"
    );
    metrics::describe_counter!(
        "duckbridge_upstream_retries_total",
        "Upstream retry attempts by stage"
    );
    metrics::describe_counter!(
        "duckbridge_line_errors_total",
        "Upstream event lines skipped because they could not be decoded"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a chat completion request
pub fn record_request(status: &str, model: &str, duration_secs: f64) {
    metrics::counter!("duckbridge_requests_total", "status" => status.to_string(), "model" => model.to_string())
        .increment(1);
    metrics::histogram!("duckbridge_request_duration_seconds", "model" => model.to_string())
        .record(duration_secs);
}

pub fn record_upstream_failure(stage: &'static str) {
    metrics::counter!("duckbridge_upstream_failures_total", "stage" => stage).increment(1);
}

pub fn record_upstream_retry(stage: &'static str) {
    metrics::counter!("duckbridge_upstream_retries_total", "stage" => stage).increment(1);
}

/// Record an undecodable upstream event line
pub fn record_line_error(kind: &'static str) {
    metrics::counter!("duckbridge_line_errors_total", "kind" => kind).increment(1);
}
