//! Backend-specific row/document shapes.

use mongodb::bson;
use serde::{Deserialize, Serialize};

use crate::domain::LogRecord;

/// A document in the `otel.demo_log` collection.
///
/// `_id` is stored as BSON binary subtype 4 (UUID) and `log_time` as a
/// native BSON datetime, which has millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoLogDocument {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: bson::Uuid,
    /// UTC insert timestamp.
    pub log_time: bson::DateTime,
}

impl From<&LogRecord> for DemoLogDocument {
    fn from(record: &LogRecord) -> Self {
        Self {
            id: bson::Uuid::from_bytes(record.id.into_bytes()),
            log_time: bson::DateTime::from_millis(record.log_time.timestamp_millis()),
        }
    }
}
