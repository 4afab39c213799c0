// handlers/root.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "drycraft-api";

/// GET / - Service banner with the route map
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Dry Craft API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Social and marketplace backend for craft makers",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login, /auth/register",
            "posts": "/posts[/:id[/comments|/reactions]], /posts/user/:userId",
            "products": "/products[/:id], /products/seller/:sellerId",
            "orders": "/orders[/:id]",
            "tutorials": "/tutorials[/:id[/progress]], /tutorials/user/:userId",
            "messages": "/messages, /messages/{seller,buyer,unread,conversations}/:id, /messages/:id/{read,reply}",
            "notifications": "/notifications/unread, /notifications/:id/read",
            "users": "/users[/:id[/follow|/unfollow|/followers|/following]], /users/suggestions"
        },
        "documentation": {
            "prefix": "Every route is also served under /api"
        }
    }))
}

/// GET /health - 200 when the store answers, 503 "degraded" otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let label = if status == StatusCode::OK { "ok" } else { "degraded" };

    (
        status,
        Json(json!({
            "status": label,
            "timestamp": Utc::now().to_rfc3339(),
            "service": SERVICE_NAME,
            "database": database
        })),
    )
}
