//! HTTP server initialization and runtime setup.
//!
//! Connects the store, wires the service into the router and runs Axum until
//! a shutdown signal arrives.

use crate::application::services::ResolutionService;
use crate::config::Config;
use crate::infrastructure::store::RedisStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis connection (validated with PING)
/// - Resolution service
/// - Axum HTTP server with graceful shutdown
///
/// On SIGINT or SIGTERM the root cancellation token fires, so in-flight store
/// calls stop with `Cancelled` and new connections are refused.
///
/// # Errors
///
/// Returns an error if:
/// - Redis is unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = RedisStore::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;

    let service = Arc::new(
        ResolutionService::new(Arc::new(store), config.service_settings())
            .context("Invalid service settings")?,
    );

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        service,
        config.base_url.clone(),
        config.top_links_default,
        shutdown.clone(),
    );

    let app = app_router(state, &config.cors_origins);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutting down, cancelling in-flight requests");
    shutdown.cancel();
}
