pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            username: username.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token: {0}")]
    MissingToken(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

/// Sign a token for `user_id` valid for the configured number of hours
pub fn issue_token(security: &SecurityConfig, user_id: Uuid, username: &str) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, username, security.jwt_expiry_hours);
    generate_jwt(&security.jwt_secret, &claims)
}

pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate JWT token and extract claims
pub fn validate_jwt(secret: &str, token: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn issued_token_round_trips() {
        let security = AppConfig::for_tests().security;
        let user_id = Uuid::new_v4();

        let token = issue_token(&security, user_id, "maya").unwrap();
        let claims = validate_jwt(&security.jwt_secret, &token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "maya");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn claims_use_camel_case_user_id() {
        let claims = Claims::new(Uuid::new_v4(), "maya", 1);
        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("userId").is_some());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let claims = Claims::new(Uuid::new_v4(), "maya", 1);
        let token = generate_jwt("one-secret", &claims).unwrap();
        assert!(matches!(validate_jwt("other-secret", &token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::new(Uuid::new_v4(), "maya", 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt("secret", &claims).unwrap();
        assert!(validate_jwt("secret", &token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::new(Uuid::new_v4(), "maya", 1);
        assert!(matches!(generate_jwt("", &claims), Err(AuthError::InvalidSecret)));
    }
}
