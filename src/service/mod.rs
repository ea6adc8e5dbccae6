//! Service layer: readiness probe, insert loop, and the worker that ties
//! them together.

#[cfg(test)]
pub(crate) mod fake;
pub mod inserter;
pub mod prober;
pub mod worker;

use tokio_util::sync::CancellationToken;

pub use inserter::PollingSummary;
pub use worker::LogWorker;

use crate::config::{WorkerConfig, redact_connection_string};
use crate::error::WorkerError;
use crate::persistence::LogStore;

/// Hosted-service entry point.
///
/// Returns `Ok(None)` without touching the network when no connection
/// string is configured. Otherwise builds the configured [`LogStore`] and
/// runs a [`LogWorker`] until `cancel` fires.
///
/// # Errors
///
/// Returns [`WorkerError::DatabaseUnavailable`] when the readiness probe
/// gives up.
pub async fn run(
    config: WorkerConfig,
    cancel: CancellationToken,
) -> Result<Option<PollingSummary>, WorkerError> {
    let Some(connection_string) = config.connection_string else {
        tracing::warn!("DB_CONNECTION_STRING not set. Exiting.");
        return Ok(None);
    };

    tracing::info!(
        db_type = %config.backend,
        connection_string = %redact_connection_string(&connection_string),
        "worker configured"
    );

    let store = LogStore::new(config.backend, connection_string);
    let worker = LogWorker::new(store, config.probe, config.insert_interval);
    worker.run(&cancel).await.map(Some)
}
