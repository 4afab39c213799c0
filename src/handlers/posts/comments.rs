use axum::{
    extract::{Path, State},
    Extension,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::validation::optional_text;
use crate::models::{Comment, CommentRequest, NotificationKind, Post};
use crate::state::AppState;

use super::super::utils::{display_name, notify, parse_id};
use super::load;

/// GET /posts/:id/comments
pub async fn list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Comment>> {
    let (_, post) = load(&state, &id).await?;
    Ok(ApiResponse::success(post.comments))
}

/// POST /posts/:id/comments - Any signed-in user; returns the updated post
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> ApiResult<Post> {
    let content = optional_text(body.content).ok_or_else(|| ApiError::bad_request("Comment content is required"))?;
    let (repo, mut post) = load(&state, &id).await?;

    if let Some(parent) = body.parent_id {
        if !post.comments.iter().any(|c| c.id == parent) {
            return Err(ApiError::bad_request("Parent comment does not exist on this post"));
        }
    }

    let author_name = display_name(&state, &user).await;
    let now = Utc::now();
    post.comments.push(Comment {
        id: Uuid::new_v4(),
        author_id: user.user_id,
        author_name: author_name.clone(),
        content,
        parent_id: body.parent_id,
        created_at: now,
        updated_at: now,
    });
    repo.update(&post).await?;

    notify(&state, NotificationKind::Comment, post.author_id, &user, &author_name, Some(post.id)).await;
    Ok(ApiResponse::created(post))
}

/// PUT /posts/:id/comments/:commentId - Comment author only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> ApiResult<Post> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let content = optional_text(body.content).ok_or_else(|| ApiError::bad_request("Comment content is required"))?;
    let (repo, mut post) = load(&state, &id).await?;

    let comment = post.comment_mut(comment_id)?;
    user.ensure_owner(comment.author_id, "edit your own comments")?;
    comment.content = content;
    comment.updated_at = Utc::now();
    repo.update(&post).await?;

    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id/comments/:commentId - Comment author or post author.
/// Replies beneath the removed comment go with it, however deeply nested.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let comment_id = parse_id(&comment_id, "comment")?;
    let (repo, mut post) = load(&state, &id).await?;

    let comment_author = post.comment_mut(comment_id)?.author_id;
    if user.user_id != comment_author && user.user_id != post.author_id {
        return Err(ApiError::forbidden(
            "You can only delete your own comments or comments on your posts",
        ));
    }

    let removed = post.remove_comment_thread(comment_id);
    repo.update(&post).await?;

    tracing::debug!("Removed {} comments from post {}", removed, post.id);

    Ok(ApiResponse::no_content())
}
