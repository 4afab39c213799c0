use axum::{
    extract::{Path, State},
    Extension,
};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Notification;
use crate::state::AppState;

use super::utils::parse_id;

/// GET /notifications/unread - The caller's unread notifications, newest first
pub async fn unread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Notification>> {
    let mut notifications: Vec<Notification> = state
        .repo::<Notification>()
        .select_by("recipientId", &user.user_id.to_string())
        .await?
        .into_iter()
        .filter(|n| !n.is_read)
        .collect();
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(ApiResponse::success(notifications))
}

/// PUT /notifications/:id/read - Recipient only
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    let id = parse_id(&id, "notification")?;
    let repo = state.repo::<Notification>();
    let mut notification = repo.select_404(id).await?;
    user.ensure_owner(notification.recipient_id, "mark your own notifications as read")?;

    if !notification.is_read {
        notification.is_read = true;
        repo.update(&notification).await?;
    }
    Ok(ApiResponse::success(notification))
}
