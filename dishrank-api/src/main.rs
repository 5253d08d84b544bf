//! dishrank API server
//!
//! Reads configuration from the environment, connects the PostgreSQL
//! catalogue, and serves the REST API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::Router;
use dishrank_api::telemetry::{init_tracing, TelemetryConfig};
use dishrank_api::{
    create_api_router, resolve_bind_addr, ApiConfig, ApiError, ApiResult, AppState, DbConfig,
    PgCatalogue,
};
use dishrank_core::{RankingConfig, SystemClock};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let ranking_config = RankingConfig::from_env();
    ranking_config.validate().map_err(dishrank_core::DishrankError::from)?;

    let db_config = DbConfig::from_env();
    let catalogue = PgCatalogue::from_config(&db_config)?;
    if db_config.bootstrap_schema {
        catalogue.ensure_schema().await?;
        tracing::info!("Catalogue schema ensured");
    }

    let api_config = ApiConfig::from_env();
    let state = AppState::new(
        Arc::new(catalogue),
        ranking_config,
        Arc::new(SystemClock),
        api_config,
    );
    tracing::info!(
        source = %state.ranking_cache.config().source,
        freshness = ?state.ranking_cache.config().freshness,
        today = %state.ranking_cache.current_day_key(),
        "Ranking cache ready"
    );

    let app: Router = create_api_router(state);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting dishrank API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
