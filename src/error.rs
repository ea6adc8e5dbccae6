//! Worker error types.
//!
//! [`WorkerError`] is the central error type for the worker. Driver errors
//! from `sqlx` and `mongodb` are wrapped verbatim so the log line carries
//! the driver's own message.

use crate::domain::BackendKind;

/// Errors produced while probing or writing to a backend.
///
/// # Severity
///
/// | Variant               | Raised by        | Effect on the worker          |
/// |-----------------------|------------------|-------------------------------|
/// | `DatabaseUnavailable` | readiness probe  | fatal, polling never starts   |
/// | `Cancelled`           | any suspend point| clean stop                    |
/// | `Sql` / `Mongo`       | probe or insert  | retried (probe) or logged     |
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The readiness probe exhausted its attempt budget.
    #[error("database {backend} not available after {waited_secs} seconds")]
    DatabaseUnavailable {
        /// Backend that never became reachable.
        backend: BackendKind,
        /// Attempt budget expressed in seconds (attempts × delay).
        waited_secs: u64,
    },

    /// The cancellation token fired while the worker was suspended.
    #[error("worker cancelled")]
    Cancelled,

    /// Relational driver failure (PostgreSQL or MySQL).
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Document-store driver failure.
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

impl WorkerError {
    /// Returns `true` if this error must stop the worker before polling.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DatabaseUnavailable { .. })
    }
}
