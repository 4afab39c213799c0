use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::Collection;

use super::store::{field_str, DatabaseError, DocumentStore};

/// Process-local document store. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, id: Uuid, doc: Value) -> Result<(), DatabaseError> {
        self.insert_unique(collection, id, doc, &[]).await
    }

    async fn insert_unique(
        &self,
        collection: Collection,
        id: Uuid,
        doc: Value,
        unique_fields: &[&str],
    ) -> Result<(), DatabaseError> {
        // Check and insert under one write lock
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if docs.iter().any(|(existing, _)| *existing == id) {
            return Err(DatabaseError::Duplicate("id".to_string()));
        }

        for field in unique_fields {
            if let Some(value) = field_str(&doc, field) {
                if docs.iter().any(|(_, d)| field_str(d, field) == Some(value)) {
                    return Err(DatabaseError::Duplicate(field.to_string()));
                }
            }
        }

        docs.push((id, doc));
        Ok(())
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(existing, _)| *existing == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| field_str(doc, field) == Some(value))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(&self, collection: Collection, id: Uuid, doc: Value) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(existing, _)| *existing == id));

        match slot {
            Some((_, existing)) => {
                *existing = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|(existing, _)| *existing != id);
        Ok(docs.len() != before)
    }

    async fn count(&self, collection: Collection) -> Result<u64, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
