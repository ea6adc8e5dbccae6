//! The worker state machine: probe once, then poll until cancelled.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::inserter::{self, PollingSummary};
use super::prober;
use crate::config::ProbePolicy;
use crate::domain::WorkerState;
use crate::error::WorkerError;
use crate::persistence::LogBackend;

/// Background worker bound to one backend.
///
/// Owns the backend for its whole run. Lifecycle transitions are published
/// on a `watch` channel; see [`LogWorker::subscribe`].
#[derive(Debug)]
pub struct LogWorker<B> {
    backend: B,
    probe: ProbePolicy,
    insert_interval: Duration,
    state: watch::Sender<WorkerState>,
}

impl<B: LogBackend> LogWorker<B> {
    /// Creates a worker in [`WorkerState::Starting`].
    #[must_use]
    pub fn new(backend: B, probe: ProbePolicy, insert_interval: Duration) -> Self {
        let (state, _) = watch::channel(WorkerState::Starting);
        Self {
            backend,
            probe,
            insert_interval,
            state,
        }
    }

    /// Returns the backend this worker writes to.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Subscribes to lifecycle transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    fn transition(&self, next: WorkerState) {
        let prev = self.state.send_replace(next);
        debug_assert!(prev.can_transition_to(next), "illegal transition {prev} -> {next}");
        tracing::debug!(backend = %self.backend.kind(), from = %prev, to = %next, "worker state");
    }

    /// Probes the backend, then inserts on a fixed interval until `cancel`
    /// fires.
    ///
    /// Returns the polling counters on a clean stop. Cancellation during
    /// the probe is a clean stop with an empty summary.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::DatabaseUnavailable`] if the probe budget is
    /// exhausted; polling is never entered in that case.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<PollingSummary, WorkerError> {
        self.transition(WorkerState::Probing);

        match prober::wait_for_ready(&self.backend, &self.probe, cancel).await {
            Ok(_) => self.transition(WorkerState::Ready),
            Err(WorkerError::Cancelled) => {
                self.transition(WorkerState::Stopped);
                return Ok(PollingSummary::default());
            }
            Err(e) => {
                self.transition(WorkerState::ProbeFailed);
                self.transition(WorkerState::Stopped);
                return Err(e);
            }
        }

        self.transition(WorkerState::Polling);
        let summary = inserter::run_polling(&self.backend, self.insert_interval, cancel).await;
        self.transition(WorkerState::Stopped);

        tracing::info!(
            backend = %self.backend.kind(),
            iterations = summary.iterations,
            inserted = summary.inserted,
            failed = summary.failed,
            "polling stopped"
        );
        Ok(summary)
    }
}
