use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Notification, NotificationKind, User};
use crate::state::AppState;

/// Parse a path id; malformed ids are a 400, not a 404
pub fn parse_id(raw: &str, label: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid {} id", label)))
}

/// Display name of the acting user, falling back to the token's username
pub async fn display_name(state: &AppState, user: &AuthUser) -> String {
    match state.repo::<User>().select_one(user.user_id).await {
        Ok(Some(found)) => found.display_name(),
        Ok(None) => user.username.clone(),
        Err(e) => {
            tracing::warn!("Could not load user {} for display name: {}", user.user_id, e);
            user.username.clone()
        }
    }
}

/// Record a notification for `recipient`. Failures are logged and never fail
/// the request that triggered them. Acting on your own content is silent.
pub async fn notify(
    state: &AppState,
    kind: NotificationKind,
    recipient: Uuid,
    sender: &AuthUser,
    sender_name: &str,
    post_id: Option<Uuid>,
) {
    if recipient == sender.user_id {
        return;
    }

    let notification = Notification::new(kind, recipient, sender.user_id, sender_name, post_id);
    if let Err(e) = state.repo::<Notification>().insert(&notification).await {
        tracing::error!("Failed to record {:?} notification for {}: {}", kind, recipient, e);
    }
}

/// 405 with a JSON body for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// JSON 404 for unknown paths
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
