//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use polisher_core::Config;
use tokio_util::sync::CancellationToken;

/// Start the server with graceful shutdown. `shutdown` is cancelled once a signal
/// arrives so background separations stop with the server.
pub async fn start_server(config: &Config, app: Router, shutdown: CancellationToken) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_audio_mb = config.max_audio_size_bytes() / 1024 / 1024,
        storage_base_dir = %config.storage_base_dir().display(),
        separator = %config.separator(),
        separation_mode = %config.separation_mode(),
        max_concurrent_separations = config.max_concurrent_separations(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Wait for Ctrl+C (SIGINT) or SIGTERM, then cancel `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
        _ = shutdown.cancelled() => {}
    }

    tracing::info!("Shutting down gracefully...");
    shutdown.cancel();
}
