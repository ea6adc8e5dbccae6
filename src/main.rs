//! db-log-worker entry point.
//!
//! Spawns the worker and stops it on Ctrl-C or SIGTERM.

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use db_log_worker::config::{LogFormat, WorkerConfig};
use db_log_worker::service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = WorkerConfig::from_env();

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "db-log-worker started");

    let cancel = CancellationToken::new();
    let mut worker = tokio::spawn(service::run(config, cancel.clone()));

    let joined = tokio::select! {
        joined = &mut worker => joined,
        () = shutdown_signal() => {
            tracing::info!("shutdown signal received");
            cancel.cancel();
            worker.await
        }
    };

    match joined.context("worker task panicked")? {
        Ok(_) => tracing::info!("worker stopped"),
        Err(e) => tracing::error!(error = %e, "Database not available after waiting: {e}"),
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
