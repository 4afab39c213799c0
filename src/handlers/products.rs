// Marketplace listings. Only the seller who created a product may change it.

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{Product, ProductRequest};
use crate::state::AppState;

use super::utils::parse_id;

/// GET /products
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state.repo::<Product>().select_all().await?;
    Ok(ApiResponse::success(products))
}

/// GET /products/seller/:sellerId
pub async fn list_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> ApiResult<Vec<Product>> {
    let seller_id = parse_id(&seller_id, "seller")?;
    let products = state
        .repo::<Product>()
        .select_by("sellerId", &seller_id.to_string())
        .await?;
    Ok(ApiResponse::success(products))
}

/// POST /products - The caller becomes the seller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> ApiResult<Product> {
    let product = Product::new(user.user_id, body.validate()?);
    state.repo::<Product>().insert(&product).await?;

    tracing::info!("Seller {} listed product {}", user.user_id, product.id);
    Ok(ApiResponse::created(product))
}

/// GET /products/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let id = parse_id(&id, "product")?;
    let product = state.repo::<Product>().select_404(id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /products/:id - Seller only, full overwrite
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> ApiResult<Product> {
    let id = parse_id(&id, "product")?;
    let listing = body.validate()?;

    let repo = state.repo::<Product>();
    let mut product = repo.select_404(id).await?;
    user.ensure_owner(product.seller_id, "update your own products")?;

    product.apply(listing);
    repo.update(&product).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /products/:id - Seller only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "product")?;
    let repo = state.repo::<Product>();
    let product = repo.select_404(id).await?;
    user.ensure_owner(product.seller_id, "delete your own products")?;

    repo.delete(id).await?;
    tracing::info!("Seller {} removed product {}", user.user_id, id);
    Ok(ApiResponse::no_content())
}
