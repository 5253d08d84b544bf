//! dishrank telemetry - structured logging and Prometheus metrics
//!
//! Everything here works standalone; no collector is required.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics, metrics_handler, DishrankMetrics, METRICS};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
