//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{AdjustStockInput, InventoryService, InventoryView};
use crate::AppState;
use shared::{InventoryMovement, InventoryRecord};

/// List all inventory records with stock status
pub async fn list_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryView>>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let records = service.list().await?;
    Ok(Json(records))
}

/// Get the inventory record for a product
pub async fn get_product_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<InventoryView>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let record = service.get_by_product(product_id).await?;
    Ok(Json(record))
}

/// Manually adjust stock for a product
pub async fn adjust_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<InventoryRecord>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let record = service
        .adjust(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(record))
}

/// List records at or below their low-stock threshold
pub async fn low_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryView>>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let records = service.low_stock().await?;
    Ok(Json(records))
}

/// Recent movement history across all products
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryMovement>>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let movements = service.movements().await?;
    Ok(Json(movements))
}

/// Movement history for one product
pub async fn product_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryMovement>>> {
    let service = InventoryService::new(state.db, state.config.store.clone());
    let movements = service.movements_for_product(product_id).await?;
    Ok(Json(movements))
}
