// handlers/mod.rs - HTTP handlers grouped by resource
//
// Public reads and token acquisition need no session. Every mutation, and
// every read scoped to the caller, runs behind `jwt_auth_middleware` and
// receives the caller as `Extension<AuthUser>`.

pub mod auth;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod posts;
pub mod products;
pub mod root;
pub mod tutorials;
pub mod users;
pub mod utils;

pub use root::{health, root};
pub use utils::{method_not_allowed, route_not_found};
