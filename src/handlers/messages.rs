// Buyer/seller messages. Every read here is scoped to the caller.

use axum::{
    extract::{Path, State},
    Extension,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::message::latest_per_partner;
use crate::models::{Message, MessageRequest, NotificationKind, ReplyRequest, User};
use crate::state::AppState;

use super::utils::{display_name, notify, parse_id};

fn newest_first(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages
}

/// The path id must be the caller
fn own_id(user: &AuthUser, raw: &str) -> Result<Uuid, ApiError> {
    let id = parse_id(raw, "user")?;
    user.ensure_owner(id, "read your own messages")?;
    Ok(id)
}

/// GET /messages - Everything the caller sent or received
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Message>> {
    let messages = state.repo::<Message>().select_all().await?;
    let mine = messages.into_iter().filter(|m| m.involves(user.user_id)).collect();
    Ok(ApiResponse::success(newest_first(mine)))
}

/// POST /messages - The caller writes to a seller as the buyer
pub async fn send(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<MessageRequest>,
) -> ApiResult<Message> {
    let new = body.validate()?;
    if new.seller_id == user.user_id {
        return Err(ApiError::bad_request("You cannot message yourself"));
    }
    state.repo::<User>().select_404(new.seller_id).await?;

    let message = Message::new(user.user_id, new.seller_id, new.product_id, new.content);
    state.repo::<Message>().insert(&message).await?;

    let name = display_name(&state, &user).await;
    notify(&state, NotificationKind::Message, message.receiver_id, &user, &name, None).await;

    Ok(ApiResponse::created(message))
}

/// GET /messages/seller/:id
pub async fn list_for_seller(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Message>> {
    let id = own_id(&user, &id)?;
    let messages = state.repo::<Message>().select_by("sellerId", &id.to_string()).await?;
    Ok(ApiResponse::success(newest_first(messages)))
}

/// GET /messages/buyer/:id
pub async fn list_for_buyer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Message>> {
    let id = own_id(&user, &id)?;
    let messages = state.repo::<Message>().select_by("buyerId", &id.to_string()).await?;
    Ok(ApiResponse::success(newest_first(messages)))
}

/// GET /messages/unread/:id - Unread messages waiting for a seller
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Message>> {
    let id = own_id(&user, &id)?;
    let messages = state.repo::<Message>().select_by("sellerId", &id.to_string()).await?;
    let unread = messages.into_iter().filter(|m| !m.is_read).collect();
    Ok(ApiResponse::success(newest_first(unread)))
}

/// GET /messages/conversations/:id - One row per conversation partner: the
/// latest message exchanged with them, newest conversation first
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Message>> {
    let id = own_id(&user, &id)?;
    let messages = state.repo::<Message>().select_all().await?;
    Ok(ApiResponse::success(latest_per_partner(id, messages)))
}

/// PUT /messages/:id/read - Receiver only
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "message")?;
    let repo = state.repo::<Message>();
    let mut message = repo.select_404(id).await?;
    user.ensure_owner(message.receiver_id, "mark your own messages as read")?;

    if !message.is_read {
        message.is_read = true;
        repo.update(&message).await?;
    }
    Ok(ApiResponse::success(message))
}

/// POST /messages/:id/reply - The seller answers; the reply is stored on the
/// original message
pub async fn reply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ReplyRequest>,
) -> ApiResult<Message> {
    let id = parse_id(&id, "message")?;
    let content = body.validate()?;

    let repo = state.repo::<Message>();
    let mut message = repo.select_404(id).await?;
    user.ensure_owner(message.seller_id, "reply to messages sent to you")?;

    message.reply(content);
    message.is_read = true;
    repo.update(&message).await?;

    let name = display_name(&state, &user).await;
    notify(&state, NotificationKind::Message, message.buyer_id, &user, &name, None).await;

    Ok(ApiResponse::success(message))
}
