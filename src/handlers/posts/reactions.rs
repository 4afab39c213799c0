use axum::{
    extract::{Path, State},
    Extension,
};

use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{NotificationKind, Post, ReactionRequest};
use crate::state::AppState;

use super::super::utils::{display_name, notify};
use super::load;

/// POST /posts/:id/reactions - `{reaction}`. Reacting again with the same
/// value removes it; a different value replaces it.
pub async fn react(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ReactionRequest>,
) -> ApiResult<Post> {
    let reaction = body.validate()?;
    let (repo, mut post) = load(&state, &id).await?;

    let current = post.react(user.user_id, reaction);
    repo.update(&post).await?;

    if current.is_some() {
        let name = display_name(&state, &user).await;
        notify(&state, NotificationKind::Reaction, post.author_id, &user, &name, Some(post.id)).await;
    }
    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id/reactions - Remove the caller's reaction, if any
pub async fn clear(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let (repo, mut post) = load(&state, &id).await?;
    if post.clear_reaction(user.user_id) {
        repo.update(&post).await?;
    }
    Ok(ApiResponse::success(post))
}
