use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, Document, DocumentStore, MemoryStore, Repository};

/// Shared by every handler. Read-only after startup apart from the store's
/// lazily created pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Build the store selected by `config.database.backend`. Postgres does not
    /// connect until the first request needs it.
    pub fn new(config: AppConfig) -> Self {
        let store: Arc<dyn DocumentStore> = match config.database.backend {
            StoreBackend::Postgres => Arc::new(DatabaseManager::new(config.database.clone())),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn repo<T: Document>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }
}
