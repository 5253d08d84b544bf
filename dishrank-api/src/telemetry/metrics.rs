//! Prometheus Metrics Definitions
//!
//! Defines the dishrank metrics with their labels and exposes the /metrics
//! endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Catalogue operation latency buckets (seconds)
const CATALOGUE_LATENCY_BUCKETS: &[f64] =
    &[0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ApiResult<DishrankMetrics>> = Lazy::new(DishrankMetrics::new);

/// Registered metrics, or `None` if registration failed (already logged).
pub fn metrics() -> Option<&'static DishrankMetrics> {
    match METRICS.as_ref() {
        Ok(metrics) => Some(metrics),
        Err(_) => None,
    }
}

/// Container for all dishrank metrics.
#[derive(Clone)]
pub struct DishrankMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Catalogue operation counter - labels: operation, status
    pub catalogue_operations_total: CounterVec,

    /// Catalogue operation duration histogram - labels: operation
    pub catalogue_operation_duration_seconds: HistogramVec,

    /// Ranking cache events - labels: event (hit, miss, reload_error)
    pub ranking_cache_events_total: CounterVec,
}

impl DishrankMetrics {
    /// Create and register all metrics with the default Prometheus registry.
    pub fn new() -> ApiResult<Self> {
        let metrics = Self {
            http_requests_total: register_counter_vec!(
                "dishrank_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "dishrank_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            catalogue_operations_total: register_counter_vec!(
                "dishrank_catalogue_operations_total",
                "Total number of recipe catalogue operations",
                &["operation", "status"]
            )
            .map_err(|e| registration_error("catalogue_operations_total", e))?,

            catalogue_operation_duration_seconds: register_histogram_vec!(
                "dishrank_catalogue_operation_duration_seconds",
                "Recipe catalogue operation duration in seconds",
                &["operation"],
                CATALOGUE_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("catalogue_operation_duration_seconds", e))?,

            ranking_cache_events_total: register_counter_vec!(
                "dishrank_ranking_cache_events_total",
                "Ranking cache hits, misses and failed reloads",
                &["event"]
            )
            .map_err(|e| registration_error("ranking_cache_events_total", e))?,
        };
        Ok(metrics)
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a catalogue operation. `status` is one of success, error, timeout.
    pub fn record_catalogue_operation(&self, operation: &str, status: &str, duration_secs: f64) {
        self.catalogue_operations_total
            .with_label_values(&[operation, status])
            .inc();
        self.catalogue_operation_duration_seconds
            .with_label_values(&[operation])
            .observe(duration_secs);
    }

    /// Record a ranking cache event.
    pub fn record_cache_event(&self, event: &str) {
        self.ranking_cache_events_total
            .with_label_values(&[event])
            .inc();
    }
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    tracing::error!(metric = name, error = %err, "Failed to register metric");
    ApiError::internal_error(format!("Failed to register {}: {}", name, err))
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (
            status = 200,
            description = "Prometheus metrics in text format",
            content_type = "text/plain"
        ),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Register on first scrape even if no request has been recorded yet.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::core::Collector;

    fn registered() -> Result<&'static DishrankMetrics, String> {
        METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))
    }

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = registered()?;
        assert!(!metrics.http_requests_total.desc().is_empty());
        Ok(())
    }

    #[test]
    fn test_record_cache_events() -> Result<(), String> {
        let metrics = registered()?;
        let before = metrics
            .ranking_cache_events_total
            .with_label_values(&["hit"])
            .get();
        metrics.record_cache_event("hit");
        let after = metrics
            .ranking_cache_events_total
            .with_label_values(&["hit"])
            .get();
        assert!(after >= before + 1.0);
        Ok(())
    }

    #[test]
    fn test_record_catalogue_operation() -> Result<(), String> {
        let metrics = registered()?;
        metrics.record_catalogue_operation("find_recipe_by_id", "success", 0.004);
        metrics.record_catalogue_operation("search_recipes", "timeout", 3.0);
        Ok(())
    }
}
