//! HTTP handlers for sale and invoice endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::created;
use crate::middleware::CurrentUser;
use crate::services::sale::{CreateSaleInput, SaleCreation, SaleFilter, SaleService};
use crate::AppState;
use shared::{Invoice, InvoiceType, Sale, SaleDetail};

/// Create a sale
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<(StatusCode, Json<SaleCreation>)> {
    let service = SaleService::new(state.db, state.config.store.clone());
    let creation = service.create_sale(current_user.0.user_id, input).await?;
    Ok(created(creation))
}

/// Get a sale with its items and invoice
pub async fn get_sale(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<SaleDetail>> {
    let service = SaleService::new(state.db, state.config.store.clone());
    let detail = service.get_sale(sale_id).await?;
    Ok(Json(detail))
}

/// List sales with optional filters
pub async fn list_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<Sale>>> {
    let service = SaleService::new(state.db, state.config.store.clone());
    let sales = service.list_sales(filter).await?;
    Ok(Json(sales))
}

/// Cancel a sale and restore its inventory
pub async fn cancel_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<SaleDetail>> {
    let service = SaleService::new(state.db, state.config.store.clone());
    let detail = service.cancel_sale(current_user.0.user_id, sale_id).await?;
    Ok(Json(detail))
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceFilter {
    pub invoice_type: Option<InvoiceType>,
}

/// List issued invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<InvoiceFilter>,
) -> AppResult<Json<Vec<Invoice>>> {
    let service = SaleService::new(state.db, state.config.store.clone());
    let invoices = service.list_invoices(filter.invoice_type).await?;
    Ok(Json(invoices))
}
