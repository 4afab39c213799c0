// Posts: feed, author pages, and author-only edits. Comments and reactions
// live in their own modules but mutate the same document.

pub mod comments;
pub mod reactions;

use axum::{
    extract::{Path, State},
    Extension,
};
use chrono::Utc;
use uuid::Uuid;

use crate::database::Repository;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{Post, PostRequest};
use crate::state::AppState;

use super::utils::parse_id;

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

/// GET /posts - Every post, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.repo::<Post>().select_all().await?;
    Ok(ApiResponse::success(newest_first(posts)))
}

/// GET /posts/user/:userId - One author's posts, newest first
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Post>> {
    let user_id = parse_id(&user_id, "user")?;
    let posts = state
        .repo::<Post>()
        .select_by("authorId", &user_id.to_string())
        .await?;
    Ok(ApiResponse::success(newest_first(posts)))
}

/// POST /posts
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<PostRequest>,
) -> ApiResult<Post> {
    let post = Post::new(user.user_id, body.validate()?);
    state.repo::<Post>().insert(&post).await?;

    tracing::info!("User {} created post {}", user.user_id, post.id);
    Ok(ApiResponse::created(post))
}

/// GET /posts/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id, "post")?;
    let post = state.repo::<Post>().select_404(id).await?;
    Ok(ApiResponse::success(post))
}

/// PUT /posts/:id - Author only. Only supplied fields change, and the
/// result must still carry content or media.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<PostRequest>,
) -> ApiResult<Post> {
    let id = parse_id(&id, "post")?;
    let repo = state.repo::<Post>();
    let mut post = repo.select_404(id).await?;
    user.ensure_owner(post.author_id, "update your own posts")?;

    let merged = PostRequest {
        content: body.content.or_else(|| Some(post.content.clone())),
        image_urls: body.image_urls.or_else(|| Some(post.image_urls.clone())),
        video_url: body.video_url.or_else(|| post.video_url.clone()),
    }
    .validate()?;

    post.content = merged.content;
    post.image_urls = merged.image_urls;
    post.video_url = merged.video_url;
    post.updated_at = Utc::now();
    repo.update(&post).await?;

    Ok(ApiResponse::success(post))
}

/// DELETE /posts/:id - Author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "post")?;
    let repo = state.repo::<Post>();
    let post = repo.select_404(id).await?;
    user.ensure_owner(post.author_id, "delete your own posts")?;

    repo.delete(id).await?;
    tracing::info!("User {} deleted post {}", user.user_id, id);
    Ok(ApiResponse::no_content())
}

/// Parse the path id and load the post, 404 when absent
pub(crate) async fn load(state: &AppState, id: &str) -> Result<(Repository<Post>, Post), ApiError> {
    let id: Uuid = parse_id(id, "post")?;
    let repo = state.repo::<Post>();
    let post = repo.select_404(id).await?;
    Ok((repo, post))
}
