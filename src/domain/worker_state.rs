//! Worker lifecycle states.
//!
//! ```text
//! Starting → Probing → Ready → Polling ⟲ → Stopped
//!                   └→ ProbeFailed → Stopped
//! ```
//!
//! `Polling` leaves only on cancellation.

use std::fmt;

use serde::Serialize;

/// Current phase of a [`crate::service::LogWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Constructed, not yet running.
    #[default]
    Starting,
    /// Waiting for the backend to accept connections.
    Probing,
    /// Probe succeeded.
    Ready,
    /// Inside the fixed-interval insert loop.
    Polling,
    /// Probe budget exhausted.
    ProbeFailed,
    /// Worker has returned.
    Stopped,
}

impl WorkerState {
    /// Returns `true` once the worker can make no further progress.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns `true` if `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Starting, Self::Probing)
                | (Self::Probing, Self::Ready | Self::ProbeFailed | Self::Stopped)
                | (Self::Ready, Self::Polling | Self::Stopped)
                | (Self::Polling | Self::ProbeFailed, Self::Stopped)
        )
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Probing => "probing",
            Self::Ready => "ready",
            Self::Polling => "polling",
            Self::ProbeFailed => "probe_failed",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
