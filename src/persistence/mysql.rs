//! MySQL store.

use std::fmt;

use sqlx::{Connection, MySqlConnection};

use crate::config::redact_connection_string;
use crate::domain::LogRecord;
use crate::error::WorkerError;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS demo_log (id INT AUTO_INCREMENT PRIMARY KEY, log_time DATETIME(6))";
const INSERT_ROW: &str = "INSERT INTO demo_log (log_time) VALUES (?)";

/// MySQL-backed store opening one `sqlx::MySqlConnection` per operation.
pub struct MySqlLogStore {
    url: String,
}

impl MySqlLogStore {
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
        let conn = MySqlConnection::connect(&self.url).await?;
        conn.close().await?;
        Ok(())
    }

    /// Creates `demo_log` if needed and inserts one row.
    ///
    /// `DATETIME(6)` has no zone, so the value written is the UTC wall
    /// clock time.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Sql`] on connection, DDL, or insert failure.
    pub async fn append(&self, record: &LogRecord) -> Result<(), WorkerError> {
        let mut conn = MySqlConnection::connect(&self.url).await?;

        sqlx::query(CREATE_TABLE).execute(&mut conn).await?;
        sqlx::query(INSERT_ROW)
            .bind(record.log_time.naive_utc())
            .execute(&mut conn)
            .await?;

        conn.close().await?;
        Ok(())
    }
}

impl fmt::Debug for MySqlLogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlLogStore")
            .field("url", &redact_connection_string(&self.url))
            .finish()
    }
}
