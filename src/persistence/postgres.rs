//! PostgreSQL store.

use std::fmt;

use sqlx::{Connection, PgConnection};

use crate::config::redact_connection_string;
use crate::domain::LogRecord;
use crate::error::WorkerError;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS demo_log (id SERIAL PRIMARY KEY, log_time TIMESTAMPTZ)";
const INSERT_ROW: &str = "INSERT INTO demo_log (log_time) VALUES ($1)";

/// PostgreSQL-backed store opening one `sqlx::PgConnection` per operation.
pub struct PostgresLogStore {
    url: String,
}

impl PostgresLogStore {
    /// Creates a store for the given connection URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Opens and closes a connection.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Sql`] if the connection cannot be opened.
    pub async fn probe(&self) -> Result<(), WorkerError> {
        let conn = PgConnection::connect(&self.url).await?;
        conn.close().await?;
        Ok(())
    }

    /// Creates `demo_log` if needed and inserts one row.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Sql`] on connection, DDL, or insert failure.
    pub async fn append(&self, record: &LogRecord) -> Result<(), WorkerError> {
        let mut conn = PgConnection::connect(&self.url).await?;

        sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
        sqlx::query(INSERT_ROW)
            .bind(record.log_time)
            .execute(&mut conn)
            .await?;

        conn.close().await?;
        Ok(())
    }
}

impl fmt::Debug for PostgresLogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresLogStore")
            .field("url", &redact_connection_string(&self.url))
            .finish()
    }
}
