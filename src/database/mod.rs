pub mod manager;
pub mod memory;
pub mod repository;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use repository::{Document, Repository};
pub use store::{DatabaseError, DocumentStore};
