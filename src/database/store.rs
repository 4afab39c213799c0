use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::types::Collection;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique field (or the id) already exists in the collection
    #[error("Duplicate value for '{0}'")]
    Duplicate(String),

    #[error("Document encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence contract shared by every resource handler.
///
/// Documents are JSON objects keyed by a server-generated UUID. Each call is a
/// single-document operation; nothing here spans documents atomically except
/// `insert_unique`, which checks the unique fields of one collection before
/// inserting.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, id: Uuid, doc: Value) -> Result<(), DatabaseError>;

    /// Insert unless another document already has the same string value in
    /// one of `unique_fields`. Fails with `DatabaseError::Duplicate(field)`.
    async fn insert_unique(
        &self,
        collection: Collection,
        id: Uuid,
        doc: Value,
        unique_fields: &[&str],
    ) -> Result<(), DatabaseError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, DatabaseError>;

    /// All documents in insertion order.
    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, DatabaseError>;

    /// Documents whose top-level `field` is a string equal to `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, DatabaseError>;

    /// Replace the whole document. Returns false when the id does not exist.
    async fn replace(&self, collection: Collection, id: Uuid, doc: Value) -> Result<bool, DatabaseError>;

    /// Returns false when the id does not exist.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError>;

    async fn count(&self, collection: Collection) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// String value of a top-level field, used for field matching by every backend.
pub(crate) fn field_str<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_str_only_matches_strings() {
        let doc = json!({ "username": "maya", "stock": 3 });
        assert_eq!(field_str(&doc, "username"), Some("maya"));
        assert_eq!(field_str(&doc, "stock"), None);
        assert_eq!(field_str(&doc, "missing"), None);
    }
}
