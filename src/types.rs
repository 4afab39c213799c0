/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Collections of the drycraft database. Each maps to one table (or one
/// in-memory map) in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Posts,
    Products,
    Orders,
    Messages,
    Tutorials,
    Notifications,
    TutorialProgress,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Posts,
        Collection::Products,
        Collection::Orders,
        Collection::Messages,
        Collection::Tutorials,
        Collection::Notifications,
        Collection::TutorialProgress,
    ];

    /// Table/collection name. Only ever these static strings reach SQL.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Products => "products",
            Collection::Orders => "orders",
            Collection::Messages => "messages",
            Collection::Tutorials => "tutorials",
            Collection::Notifications => "notifications",
            Collection::TutorialProgress => "tutorial_progress",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
