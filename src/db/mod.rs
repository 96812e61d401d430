mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::Result;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A schema-less record: system-assigned id and creation timestamp plus an
/// arbitrary field map. Serializes flat, the way the wire format expects:
/// `{"_id": ..., "createdAt": ..., <fields>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Injected data-access seam for the resource and auth services. One
/// implementation talks to Postgres, one keeps everything in memory for
/// tests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document, assigning id and creation time.
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<Document>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>>;

    /// First document whose string field equals `value` exactly, in
    /// creation order.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>>;

    /// Merge `patch` into the document's fields. Returns the updated
    /// document, or None when the id does not exist.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Map<String, Value>,
    ) -> Result<Option<Document>>;

    /// Remove the document, returning its last snapshot when it existed.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<Option<Document>>;

    /// One page of documents in creation order.
    async fn page(&self, collection: &str, skip: u64, limit: u64) -> Result<Vec<Document>>;

    async fn count(&self, collection: &str) -> Result<u64>;

    /// Case-insensitive substring match of `query` against any of the named
    /// string fields.
    async fn search(
        &self,
        collection: &str,
        query: &str,
        fields: &[String],
    ) -> Result<Vec<Document>>;
}
