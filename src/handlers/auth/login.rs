// handlers/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use crate::auth::{issue_token, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::{LoginRequest, User};
use crate::state::AppState;

use super::AuthPayload;

/**
 * POST /auth/login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "username": "string", "password": "string" }
 * ```
 *
 * Expected Output (200):
 * ```json
 * { "token": "eyJhbGciOiJIUzI1NiI...", "user": { "id": "...", "username": "maya", ... } }
 * ```
 *
 * Errors: 400 when either field is missing, 401 for an unknown user or a
 * wrong password. Both 401 cases share one message.
 */
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<AuthPayload> {
    let username = body.username.map(|u| u.trim().to_string()).unwrap_or_default();
    let password = body.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = state
        .repo::<User>()
        .select_first_by("username", &username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&password, &user.password_hash) {
        tracing::info!("Failed login for {}", username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(&state.config.security, user.id, &user.username)?;
    tracing::info!("User {} logged in", user.username);

    Ok(ApiResponse::success(AuthPayload {
        token,
        user: user.public(),
    }))
}
