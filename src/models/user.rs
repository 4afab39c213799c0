use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::validation::{optional_text, FieldErrors};

/// Fields that must be unique across all users
pub const UNIQUE_FIELDS: &[&str] = &["username", "email"];

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub followers: Vec<Uuid>,
    #[serde(default)]
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;
    const LABEL: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl User {
    pub fn new(registration: Registration, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            bio: None,
            profile_picture: None,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last" when a name is on file, otherwise the username
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// User as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            profile_picture: user.profile_picture.clone(),
            followers: user.followers.clone(),
            following: user.following.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A registration that passed validation; the password is still plaintext
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        let mut errors = FieldErrors::new();
        let username = errors.require_text("username", "Username", self.username);
        let email = errors.require_text("email", "Email", self.email);
        // Passwords are not trimmed
        let password = match self.password {
            Some(p) if !p.is_empty() => p,
            _ => {
                errors.add("password", "Password is required");
                String::new()
            }
        };
        errors.finish("Username, email, and password are required")?;

        if !looks_like_email(&email) {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(Registration {
            username,
            email: email.to_lowercase(),
            password,
            first_name: optional_text(self.first_name),
            last_name: optional_text(self.last_name),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    /// Apply supplied fields; an empty string clears the field
    pub fn apply(self, user: &mut User) -> Result<(), ApiError> {
        if self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.profile_picture.is_none()
        {
            return Err(ApiError::bad_request("No profile fields supplied"));
        }

        if let Some(v) = self.first_name {
            user.first_name = optional_text(Some(v));
        }
        if let Some(v) = self.last_name {
            user.last_name = optional_text(Some(v));
        }
        if let Some(v) = self.bio {
            user.bio = optional_text(Some(v));
        }
        if let Some(v) = self.profile_picture {
            user.profile_picture = optional_text(Some(v));
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// Something@something.tld, with no whitespace
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}
