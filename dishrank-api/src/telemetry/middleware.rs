//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Wraps every request in a tracing span, records Prometheus metrics and
//! logs completion.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::metrics;

static RANKING_SEGMENT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(/api/v1/rankings/)([^/]+)$").ok());

static RECIPE_SEGMENT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(/api/v1/recipes/)([^/]+)$").ok());

/// Normalize path for metrics/spans (collapse dates and recipe ids).
///
/// Keeps Prometheus label cardinality bounded.
fn normalize_path(path: &str) -> String {
    let rules: [(&Lazy<Option<Regex>>, &str, &[&str]); 2] = [
        (&RANKING_SEGMENT, "{date_kst}", &["today", "cache"]),
        (&RECIPE_SEGMENT, "{recipe_id}", &["search"]),
    ];

    for (pattern, placeholder, literal_segments) in rules {
        let Some(re) = pattern.as_ref() else { continue };
        if let Some(caps) = re.captures(path) {
            if literal_segments.contains(&&caps[2]) {
                return path.to_string();
            }
            return format!("{}{}", &caps[1], placeholder);
        }
    }
    path.to_string()
}

/// Observability middleware for Axum.
///
/// 1. Tracing span per request
/// 2. Prometheus metrics recording
/// 3. Completion log line
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(metrics) = metrics() {
        metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        );
    }

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    }

    response
}
