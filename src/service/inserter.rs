//! Fixed-interval insert loop.
//!
//! Every iteration ensures the storage target and writes one [`LogRecord`].
//! Failures are logged and the loop carries on after the same delay; there
//! is no backoff and no exit edge other than cancellation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::domain::LogRecord;
use crate::error::WorkerError;
use crate::persistence::LogBackend;

/// Counters for one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollingSummary {
    /// Iterations started.
    pub iterations: u64,
    /// Iterations whose insert succeeded.
    pub inserted: u64,
    /// Iterations whose insert failed.
    pub failed: u64,
}

/// Writes one record stamped with the current UTC time.
///
/// The timestamp is truncated to the backend's stored precision before the
/// write, so the returned (and logged) value is exactly what was persisted.
/// `not_before` keeps timestamps non-decreasing across a run when the wall
/// clock steps backwards.
///
/// # Errors
///
/// Propagates the backend's schema or write error.
pub async fn insert_once<B>(
    backend: &B,
    not_before: Option<DateTime<Utc>>,
) -> Result<LogRecord, WorkerError>
where
    B: LogBackend + ?Sized,
{
    let now = backend.kind().truncate_to_storage(Utc::now());
    let log_time = not_before.map_or(now, |prev| now.max(prev));
    let record = LogRecord::at(log_time);
    backend.append(&record).await?;
    Ok(record)
}

/// Runs the insert loop until `cancel` fires.
///
/// The token is checked before each iteration and raced against every
/// inter-iteration delay. An in-flight insert is allowed to finish.
pub async fn run_polling<B>(
    backend: &B,
    interval: Duration,
    cancel: &CancellationToken,
) -> PollingSummary
where
    B: LogBackend + ?Sized,
{
    let kind = backend.kind();
    let mut summary = PollingSummary::default();
    let mut last: Option<DateTime<Utc>> = None;

    while !cancel.is_cancelled() {
        summary.iterations += 1;

        match insert_once(backend, last).await {
            Ok(record) => {
                summary.inserted += 1;
                last = Some(record.log_time);
                tracing::info!(
                    backend = %kind,
                    log_time = %record.log_time,
                    "[{}] Inserted {}",
                    kind.label(),
                    record.log_time
                );
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    backend = %kind,
                    iteration = summary.iterations,
                    error = %e,
                    "[Error after initial DB ready] {e}"
                );
            }
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    summary
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    use super::*;
    use crate::domain::BackendKind;
    use crate::service::fake::{LogCapture, ScriptedBackend};

    const INTERVAL: Duration = Duration::from_secs(10);

    fn cancel_after(cancel: &CancellationToken, after: Duration) {
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            trigger.cancel();
        });
    }

    #[tokio::test]
    async fn insert_once_stamps_current_time() {
        let backend = ScriptedBackend::reachable_after(0);
        let before = Utc::now();

        let record = assert_ok!(insert_once(&backend, None).await);

        assert!(record.log_time >= BackendKind::Postgres.truncate_to_storage(before));
        assert!(record.log_time <= Utc::now());
        assert_eq!(backend.append_calls(), 1);
    }

    #[tokio::test]
    async fn insert_once_uses_stored_precision() {
        let backend = ScriptedBackend::reachable_after(0).with_kind(BackendKind::Mongo);

        let record = assert_ok!(insert_once(&backend, None).await);

        assert_eq!(record.log_time.timestamp_subsec_nanos() % 1_000_000, 0);
        let appended = backend.appended().await;
        let Some((_, stored)) = appended.first() else {
            panic!("nothing appended");
        };
        assert_eq!(stored.log_time, record.log_time);
    }

    #[tokio::test]
    async fn insert_once_never_goes_backwards() {
        let backend = ScriptedBackend::reachable_after(0);
        let future = Utc::now() + chrono::Duration::hours(1);

        let record = assert_ok!(insert_once(&backend, Some(future)).await);

        assert_eq!(record.log_time, future);
    }

    #[tokio::test]
    async fn insert_once_propagates_backend_error() {
        let backend = ScriptedBackend::reachable_after(0).failing_appends(&[1]);
        let result = insert_once(&backend, None).await;
        assert!(matches!(result, Err(WorkerError::Sql(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn inserts_once_per_interval_until_cancelled() {
        let backend = ScriptedBackend::reachable_after(0);
        let cancel = CancellationToken::new();
        cancel_after(&cancel, Duration::from_secs(25));
        let start = Instant::now();

        let summary = run_polling(&backend, INTERVAL, &cancel).await;

        assert_eq!(
            summary,
            PollingSummary {
                iterations: 3,
                inserted: 3,
                failed: 0
            }
        );
        let appended = backend.appended().await;
        let offsets: Vec<Duration> = appended.iter().map(|(at, _)| *at - start).collect();
        assert_eq!(
            offsets,
            vec![Duration::ZERO, INTERVAL, INTERVAL * 2]
        );
        for pair in appended.windows(2) {
            if let [(_, a), (_, b)] = pair {
                assert!(b.log_time >= a.log_time);
            }
        }
        assert_eq!(start.elapsed(), Duration::from_secs(25));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_iteration_does_not_stop_the_loop() {
        let backend = ScriptedBackend::reachable_after(0).failing_appends(&[1, 2]);
        let cancel = CancellationToken::new();
        cancel_after(&cancel, Duration::from_secs(35));
        let start = Instant::now();

        let summary = run_polling(&backend, INTERVAL, &cancel).await;

        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.inserted, 2);
        let appended = backend.appended().await;
        let offsets: Vec<Duration> = appended.iter().map(|(at, _)| *at - start).collect();
        assert_eq!(offsets, vec![INTERVAL * 2, INTERVAL * 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn logs_one_line_per_iteration() {
        let logs = LogCapture::install();
        let backend = ScriptedBackend::reachable_after(0).failing_appends(&[2]);
        let cancel = CancellationToken::new();
        cancel_after(&cancel, Duration::from_secs(25));

        run_polling(&backend, INTERVAL, &cancel).await;

        let lines = logs.lines();
        let inserted: Vec<&String> = lines
            .iter()
            .filter(|l| l.contains("[Postgres] Inserted "))
            .collect();
        assert_eq!(inserted.len(), 2);
        let appended = backend.appended().await;
        for ((_, record), line) in appended.iter().zip(&inserted) {
            assert!(line.contains(&format!("[Postgres] Inserted {}", record.log_time)));
        }
        let errors = lines
            .iter()
            .filter(|l| l.contains("[Error after initial DB ready]"))
            .count();
        assert_eq!(errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_runs_nothing() {
        let backend = ScriptedBackend::reachable_after(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = run_polling(&backend, INTERVAL, &cancel).await;

        assert_eq!(summary, PollingSummary::default());
        assert_eq!(backend.append_calls(), 0);
    }
}
