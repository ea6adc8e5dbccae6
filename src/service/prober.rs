//! Readiness probe: bounded connectivity attempts before polling starts.

use tokio_util::sync::CancellationToken;

use crate::config::ProbePolicy;
use crate::error::WorkerError;
use crate::persistence::LogBackend;

/// Probes `backend` until it answers or the budget is spent.
///
/// Returns the 1-based attempt number that succeeded. Each failure is logged
/// and followed by a sleep of `policy.delay`; no sleep follows the last
/// attempt. Both the attempt and the sleep are raced against `cancel`.
///
/// # Errors
///
/// Returns [`WorkerError::DatabaseUnavailable`] when every attempt fails, or
/// [`WorkerError::Cancelled`] if `cancel` fires during an attempt or a
/// sleep.
pub async fn wait_for_ready<B>(
    backend: &B,
    policy: &ProbePolicy,
    cancel: &CancellationToken,
) -> Result<u32, WorkerError>
where
    B: LogBackend + ?Sized,
{
    let kind = backend.kind();

    for attempt in 1..=policy.max_attempts {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WorkerError::Cancelled),
            outcome = backend.probe() => outcome,
        };

        match outcome {
            Ok(()) => {
                tracing::info!(backend = %kind, attempt, "[{}] Connection successful.", kind.label());
                return Ok(attempt);
            }
            Err(e) => {
                tracing::warn!(
                    backend = %kind,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "[{kind}] Waiting for database... ({attempt}/{})",
                    policy.max_attempts
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                () = cancel.cancelled() => return Err(WorkerError::Cancelled),
                () = tokio::time::sleep(policy.delay) => {}
            }
        }
    }

    Err(WorkerError::DatabaseUnavailable {
        backend: kind,
        waited_secs: policy.budget_secs(),
    })
}
