//! The single persisted entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One timestamp row/document.
///
/// Built in memory immediately before an insert and never read back. The
/// `id` is only stored by the document backend; relational backends let the
/// database assign an integer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Locally generated identifier (UUID v4).
    pub id: Uuid,
    /// UTC timestamp of the insert.
    pub log_time: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a record stamped with `log_time`.
    #[must_use]
    pub fn at(log_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            log_time,
        }
    }

    /// Creates a record stamped with the current UTC time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}
