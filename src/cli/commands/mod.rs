pub mod auth;
pub mod health;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod posts;
pub mod products;
pub mod tutorials;
