//! Supported storage backends.
//!
//! [`BackendKind`] is resolved once from `DB_TYPE` and never changes for the
//! lifetime of the process. Every backend-specific code path matches on it
//! exhaustively.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

/// The database engine the worker writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// PostgreSQL (`TIMESTAMPTZ` column, `SERIAL` key).
    #[default]
    Postgres,
    /// MySQL / MariaDB (`DATETIME(6)` column, `AUTO_INCREMENT` key).
    MySql,
    /// MongoDB (`otel.demo_log` collection).
    Mongo,
}

impl BackendKind {
    /// Resolves a `DB_TYPE` setting.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Absent or unrecognised values select [`BackendKind::Postgres`].
    #[must_use]
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("mysql") => Self::MySql,
            Some("mongo") => Self::Mongo,
            _ => Self::Postgres,
        }
    }

    /// Configuration spelling (`postgres`, `mysql`, `mongo`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Mongo => "mongo",
        }
    }

    /// Fractional-second digits the backend keeps for `log_time`.
    ///
    /// `TIMESTAMPTZ` and `DATETIME(6)` store microseconds; a BSON datetime
    /// stores milliseconds.
    #[must_use]
    pub const fn timestamp_digits(&self) -> u16 {
        match self {
            Self::Postgres | Self::MySql => 6,
            Self::Mongo => 3,
        }
    }

    /// Truncates `ts` to the precision this backend persists, so the value
    /// logged for an insert is the value stored.
    #[must_use]
    pub fn truncate_to_storage(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        ts.trunc_subsecs(self.timestamp_digits())
    }

    /// Human-facing name used as the log line prefix.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Postgres => "Postgres",
            Self::MySql => "MySQL",
            Self::Mongo => "MongoDB",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
