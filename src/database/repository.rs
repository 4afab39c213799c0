use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::store::{DatabaseError, DocumentStore};
use crate::types::Collection;

/// A typed document living in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Human-readable name used in "not found" messages
    const LABEL: &'static str;

    fn id(&self) -> Uuid;
}

/// Typed access to one collection of the document store
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn insert(&self, doc: &T) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(doc)?;
        self.store.insert(T::COLLECTION, doc.id(), value).await
    }

    pub async fn insert_unique(&self, doc: &T, unique_fields: &[&str]) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(doc)?;
        self.store
            .insert_unique(T::COLLECTION, doc.id(), value, unique_fields)
            .await
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let docs = self.store.find_all(T::COLLECTION).await?;
        Self::decode_all(docs)
    }

    pub async fn select_one(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        match self.store.find_by_id(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn select_404(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", T::LABEL)))
    }

    pub async fn select_by(&self, field: &str, value: &str) -> Result<Vec<T>, DatabaseError> {
        let docs = self.store.find_by_field(T::COLLECTION, field, value).await?;
        Self::decode_all(docs)
    }

    pub async fn select_first_by(&self, field: &str, value: &str) -> Result<Option<T>, DatabaseError> {
        Ok(self.select_by(field, value).await?.into_iter().next())
    }

    /// Persist the whole document; 404 when it disappeared in the meantime
    pub async fn update(&self, doc: &T) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(doc)?;
        if self.store.replace(T::COLLECTION, doc.id(), value).await? {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("{} not found", T::LABEL)))
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn count(&self) -> Result<u64, DatabaseError> {
        self.store.count(T::COLLECTION).await
    }

    fn decode_all(docs: Vec<serde_json::Value>) -> Result<Vec<T>, DatabaseError> {
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(DatabaseError::from))
            .collect()
    }
}
