//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{ProductFilter, ProductService};
use crate::AppState;
use shared::{Category, Product};

/// List products with optional filters
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(filter).await?;
    Ok(Json(products))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = ProductService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}
