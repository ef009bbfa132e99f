//! Prometheus metrics endpoint
//!
//! Exposes relay metrics in Prometheus format for monitoring.

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

    metrics::describe_counter!("athena_requests_total", "Chat requests by outcome");
    metrics::describe_histogram!(
        "athena_request_duration_seconds",
        "Chat request duration in seconds"
    );
    metrics::describe_counter!(
        "athena_quota_rejections_total",
        "Requests rejected because the daily quota was used up"
    );
    metrics::describe_counter!(
        "athena_upstream_errors_total",
        "Completion provider failures by kind"
    );
    metrics::describe_counter!(
        "athena_tokens_processed_total",
        "Tokens reported by the completion provider"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a finished chat request
pub fn record_request(outcome: &str, duration_secs: f64) {
    metrics::counter!("athena_requests_total", "outcome" => outcome.to_string()).increment(1);
    metrics::histogram!("athena_request_duration_seconds").record(duration_secs);
}

/// Record a quota rejection
pub fn record_quota_rejection() {
    metrics::counter!("athena_quota_rejections_total").increment(1);
}

/// Record an upstream failure
pub fn record_upstream_error(kind: &str, status: u16) {
    metrics::counter!(
        "athena_upstream_errors_total",
        "kind" => kind.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record tokens processed
pub fn record_tokens(token_type: &str, count: u64, model: &str) {
    metrics::counter!(
        "athena_tokens_processed_total",
        "type" => token_type.to_string(),
        "model" => model.to_string()
    )
    .increment(count);
}
