// User directory, profiles, and the follow graph. Responses always use the
// public view, so password hashes never leave the store.

use axum::{
    extract::{Path, State},
    Extension,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{NotificationKind, ProfileUpdate, PublicUser, RegisterRequest, User};
use crate::state::AppState;

use super::auth::register::create_user;
use super::utils::{notify, parse_id};

pub const SUGGESTION_LIMIT: usize = 10;

fn public(users: Vec<User>) -> Vec<PublicUser> {
    users.iter().map(PublicUser::from).collect()
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    let users = state.repo::<User>().select_all().await?;
    Ok(ApiResponse::success(public(users)))
}

/// POST /users - Same validation and uniqueness rules as registration, no token
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<PublicUser> {
    let user = create_user(&state, body).await?;
    Ok(ApiResponse::created(user.public()))
}

/// GET /users/suggestions - A handful of profiles to follow
pub async fn suggestions(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    let users = state.repo::<User>().select_all().await?;
    let suggested = users.iter().take(SUGGESTION_LIMIT).map(PublicUser::from).collect();
    Ok(ApiResponse::success(suggested))
}

/// GET /users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PublicUser> {
    let id = parse_id(&id, "user")?;
    let user = state.repo::<User>().select_404(id).await?;
    Ok(ApiResponse::success(user.public()))
}

/// PUT /users/:id - Own profile only
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> ApiResult<PublicUser> {
    let id = parse_id(&id, "user")?;
    caller.ensure_owner(id, "edit your own profile")?;

    let repo = state.repo::<User>();
    let mut user = repo.select_404(id).await?;
    body.apply(&mut user)?;
    repo.update(&user).await?;

    Ok(ApiResponse::success(user.public()))
}

/// Load caller and target for a follow-graph change
async fn follow_pair(state: &AppState, caller: &AuthUser, target: &str) -> Result<(User, User), ApiError> {
    let target_id = parse_id(target, "user")?;
    if target_id == caller.user_id {
        return Err(ApiError::bad_request("You cannot follow yourself"));
    }

    let repo = state.repo::<User>();
    let target = repo.select_404(target_id).await?;
    let me = repo
        .select_one(caller.user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden("Invalid or missing session"))?;
    Ok((me, target))
}

/// POST /users/:id/follow - Idempotent; returns the followed user
pub async fn follow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<PublicUser> {
    let (mut me, mut target) = follow_pair(&state, &caller, &id).await?;
    if me.following.contains(&target.id) && target.followers.contains(&me.id) {
        return Ok(ApiResponse::success(target.public()));
    }

    let now = Utc::now();
    add_once(&mut me.following, target.id);
    add_once(&mut target.followers, me.id);
    me.updated_at = now;
    target.updated_at = now;

    // Two independent single-document writes
    let repo = state.repo::<User>();
    repo.update(&target).await?;
    repo.update(&me).await?;

    notify(&state, NotificationKind::Follow, target.id, &caller, &me.display_name(), None).await;
    Ok(ApiResponse::success(target.public()))
}

/// POST /users/:id/unfollow - Idempotent; returns the unfollowed user
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<PublicUser> {
    let (mut me, mut target) = follow_pair(&state, &caller, &id).await?;
    if !me.following.contains(&target.id) && !target.followers.contains(&me.id) {
        return Ok(ApiResponse::success(target.public()));
    }

    let now = Utc::now();
    me.following.retain(|u| *u != target.id);
    target.followers.retain(|u| *u != me.id);
    me.updated_at = now;
    target.updated_at = now;

    let repo = state.repo::<User>();
    repo.update(&target).await?;
    repo.update(&me).await?;

    Ok(ApiResponse::success(target.public()))
}

/// GET /users/:id/followers
pub async fn followers(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<PublicUser>> {
    let id = parse_id(&id, "user")?;
    let user = state.repo::<User>().select_404(id).await?;
    Ok(ApiResponse::success(resolve(&state, &user.followers).await?))
}

/// GET /users/:id/following
pub async fn following(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<PublicUser>> {
    let id = parse_id(&id, "user")?;
    let user = state.repo::<User>().select_404(id).await?;
    Ok(ApiResponse::success(resolve(&state, &user.following).await?))
}

/// Look up each id, skipping users that no longer exist
async fn resolve(state: &AppState, ids: &[Uuid]) -> Result<Vec<PublicUser>, ApiError> {
    let repo = state.repo::<User>();
    let mut users = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(user) = repo.select_one(*id).await? {
            users.push(user.public());
        }
    }
    Ok(users)
}

fn add_once(list: &mut Vec<Uuid>, id: Uuid) {
    if !list.contains(&id) {
        list.push(id);
    }
}
