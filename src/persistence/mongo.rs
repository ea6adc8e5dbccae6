//! MongoDB store.
//!
//! Unlike the relational stores this one keeps a single
//! [`mongodb::Client`] for the life of the process; the driver owns its own
//! connection pool. The client is created on first use so that an
//! unparsable or unresolvable URI counts as a failed probe attempt rather
//! than a startup error.

use std::fmt;

use mongodb::{Client, Collection};
use tokio::sync::OnceCell;

use super::models::DemoLogDocument;
use super::{MONGO_COLLECTION, MONGO_DATABASE};
use crate::config::redact_connection_string;
use crate::domain::LogRecord;
use crate::error::WorkerError;

/// MongoDB-backed store writing to `otel.demo_log`.
pub struct MongoLogStore {
    uri: String,
    client: OnceCell<Client>,
}

impl MongoLogStore {
    /// Creates a store for the given connection URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, WorkerError> {
        self.client
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.uri).await?;
                Ok::<_, WorkerError>(client)
            })
            .await
    }

    fn collection(client: &Client) -> Collection<DemoLogDocument> {
        client
            .database(MONGO_DATABASE)
            .collection::<DemoLogDocument>(MONGO_COLLECTION)
    }

    /// Issues a `listDatabases` request.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Mongo`] if the URI is invalid or no server
    /// answers within the driver's selection timeout.
    pub async fn probe(&self) -> Result<(), WorkerError> {
        let client = self.client().await?;
        client.list_database_names().await?;
        Ok(())
    }

    /// Inserts one document. Collections are created implicitly by the
    /// server on first write.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Mongo`] on client or write failure.
    pub async fn append(&self, record: &LogRecord) -> Result<(), WorkerError> {
        let client = self.client().await?;
        Self::collection(client)
            .insert_one(DemoLogDocument::from(record))
            .await?;
        Ok(())
    }
}

impl fmt::Debug for MongoLogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoLogStore")
            .field("uri", &redact_connection_string(&self.uri))
            .field("connected", &self.client.initialized())
            .finish()
    }
}
