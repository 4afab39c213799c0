// handlers/auth/register.rs - POST /auth/register (also /auth-register)

use axum::extract::State;

use crate::auth::{hash_password, issue_token};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::user::{self, RegisterRequest, User};
use crate::state::AppState;

use super::AuthPayload;

/// POST /auth/register - Create an account and sign the caller in.
///
/// 400 for missing fields, a malformed email, a short password, or a taken
/// username/email; 201 with the same `{token, user}` shape as login.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    let user = create_user(&state, body).await?;
    let token = issue_token(&state.config.security, user.id, &user.username)?;

    Ok(ApiResponse::created(AuthPayload {
        token,
        user: user.public(),
    }))
}

/// Validate, hash, and insert a new user. Shared with `POST /users`.
pub async fn create_user(state: &AppState, body: RegisterRequest) -> Result<User, crate::error::ApiError> {
    let registration = body.validate()?;
    let password_hash = hash_password(&registration.password)?;
    let user = User::new(registration, password_hash);

    state
        .repo::<User>()
        .insert_unique(&user, user::UNIQUE_FIELDS)
        .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}
