//! Tracing Subscriber Initialization
//!
//! Installs a `tracing-subscriber` registry with an env filter and either
//! JSON (production) or human-readable (development) output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

const DEFAULT_FILTER: &str = "dishrank_api=info,dishrank_storage=info,tower_http=info,info";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (production, staging, development)
    pub environment: String,
    /// Output format; JSON unless the environment is development
    pub log_format: LogFormat,
    /// Filter directives used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let environment = std::env::var("DISHRANK_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());
        let log_format = std::env::var("DISHRANK_LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(if environment == "development" {
                LogFormat::Pretty
            } else {
                LogFormat::Json
            });

        Self {
            service_name: std::env::var("DISHRANK_SERVICE_NAME")
                .unwrap_or_else(|_| "dishrank-api".to_string()),
            service_version: std::env::var("DISHRANK_SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            environment,
            log_format,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup. `RUST_LOG` overrides the default filter.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    result.map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        environment = %config.environment,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_telemetry_config_default_filter() {
        let config = TelemetryConfig::default();
        assert!(config.default_filter.contains("dishrank_api"));
        assert!(!config.service_version.is_empty());
    }
}
