//! Persistence layer: one store per supported backend.
//!
//! Provides the [`LogBackend`] trait the service layer drives, the three
//! concrete stores, and [`LogStore`], the tagged union selected once from
//! configuration.

pub mod models;
pub mod mongo;
pub mod mysql;
pub mod postgres;

use async_trait::async_trait;

pub use mongo::MongoLogStore;
pub use mysql::MySqlLogStore;
pub use postgres::PostgresLogStore;

use crate::domain::{BackendKind, LogRecord};
use crate::error::WorkerError;

/// Table name used by both relational backends.
pub const LOG_TABLE: &str = "demo_log";
/// Database name used by the document backend.
pub const MONGO_DATABASE: &str = "otel";
/// Collection name used by the document backend.
pub const MONGO_COLLECTION: &str = "demo_log";

/// A storage target the worker can probe and append to.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// Backend this store writes to.
    fn kind(&self) -> BackendKind;

    /// Performs one connectivity check.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the backend is unreachable.
    async fn probe(&self) -> Result<(), WorkerError>;

    /// Ensures the storage target exists, then writes `record`.
    ///
    /// # Errors
    ///
    /// Returns the driver error if either the schema step or the insert
    /// fails.
    async fn append(&self, record: &LogRecord) -> Result<(), WorkerError>;
}

/// The store chosen for this process.
#[derive(Debug)]
pub enum LogStore {
    /// PostgreSQL store.
    Postgres(PostgresLogStore),
    /// MySQL store.
    MySql(MySqlLogStore),
    /// MongoDB store.
    Mongo(MongoLogStore),
}

impl LogStore {
    /// Builds the store for `kind`. No I/O happens until the first call.
    #[must_use]
    pub fn new(kind: BackendKind, connection_string: impl Into<String>) -> Self {
        let conn = connection_string.into();
        match kind {
            BackendKind::Postgres => Self::Postgres(PostgresLogStore::new(conn)),
            BackendKind::MySql => Self::MySql(MySqlLogStore::new(conn)),
            BackendKind::Mongo => Self::Mongo(MongoLogStore::new(conn)),
        }
    }
}

#[async_trait]
impl LogBackend for LogStore {
    fn kind(&self) -> BackendKind {
        match self {
            Self::Postgres(_) => BackendKind::Postgres,
            Self::MySql(_) => BackendKind::MySql,
            Self::Mongo(_) => BackendKind::Mongo,
        }
    }

    async fn probe(&self) -> Result<(), WorkerError> {
        match self {
            Self::Postgres(store) => store.probe().await,
            Self::MySql(store) => store.probe().await,
            Self::Mongo(store) => store.probe().await,
        }
    }

    async fn append(&self, record: &LogRecord) -> Result<(), WorkerError> {
        match self {
            Self::Postgres(store) => store.append(record).await,
            Self::MySql(store) => store.append(record).await,
            Self::Mongo(store) => store.append(record).await,
        }
    }
}
