//! sg-server: HTTP API server for the snapgrid gallery.
//!
//! This crate ties the sg-* crates into a running server:
//!
//! - Axum routes for the gallery, health, and cache invalidation
//! - Cache handle construction plus the background liveness probe
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sg_cache::CacheHandle;
use sg_core::config::Config;
use sg_upstream::MediaHostClient;

use crate::context::AppContext;

/// Start the snapgrid server.
///
/// Connects the cache, builds the [`AppContext`], and serves HTTP until a
/// shutdown signal is received.
pub async fn start(config: Config) -> sg_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let cache = CacheHandle::from_config(&config.cache).await;
    let fetcher = Arc::new(MediaHostClient::new(&config.upstream));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| sg_core::Error::Validation(format!("Invalid server address: {e}")))?;

    let cancel = CancellationToken::new();
    let probe_handle = cache.spawn_probe(
        Duration::from_secs(config.cache.probe_interval_secs),
        cancel.clone(),
    );

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, cache, fetcher);
    let app = router::build_router(ctx, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| sg_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting server on {addr}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await;

    // Signal background tasks to stop.
    cancel.cancel();
    if let Some(handle) = probe_handle {
        let _ = handle.await;
    }

    served.map_err(|e| sg_core::Error::Internal(format!("Server error: {e}")))?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
pub async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
