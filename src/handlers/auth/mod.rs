// Public authentication endpoints: token acquisition

pub mod login;
pub mod register;

use serde::Serialize;

use crate::models::PublicUser;

pub use login::login;
pub use register::register;

/// Body returned by both login and register
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: PublicUser,
}
