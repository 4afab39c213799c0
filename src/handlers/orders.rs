// Orders are created pending; later status changes happen outside this API.

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::order::{price_line, OrderDraft};
use crate::models::{Order, OrderRequest, Product};
use crate::state::AppState;

use super::utils::parse_id;

/// GET /orders
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    let orders = state.repo::<Order>().select_all().await?;
    Ok(ApiResponse::success(orders))
}

/// GET /orders/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Order> {
    let id = parse_id(&id, "order")?;
    let order = state.repo::<Order>().select_404(id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /orders - Prices come from the stored products, never the request
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<OrderRequest>,
) -> ApiResult<Order> {
    let OrderDraft {
        lines,
        shipping_address,
        note,
    } = body.validate()?;

    let products = state.repo::<Product>();
    let mut items = Vec::with_capacity(lines.len());
    for (product_id, quantity) in lines {
        let product = products
            .select_one(product_id)
            .await?
            .ok_or_else(|| ApiError::bad_request(format!("Product {} does not exist", product_id)))?;
        items.push(price_line(&product, quantity)?);
    }

    let order = Order::new(user.user_id, items, shipping_address, note);
    state.repo::<Order>().insert(&order).await?;

    tracing::info!("User {} placed order {} ({:.2})", user.user_id, order.id, order.total);
    Ok(ApiResponse::created(order))
}
