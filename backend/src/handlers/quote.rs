//! HTTP handlers for quote endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::created;
use crate::middleware::CurrentUser;
use crate::services::quote::{CreateQuoteInput, QuoteFilter, QuoteService};
use crate::AppState;
use shared::{Quote, QuoteAction, QuoteDetail};

/// Create a quote
pub async fn create_quote(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateQuoteInput>,
) -> AppResult<(StatusCode, Json<QuoteDetail>)> {
    let service = QuoteService::new(state.db, state.config.store.clone());
    let detail = service.create_quote(current_user.0.user_id, input).await?;
    Ok(created(detail))
}

/// Get a quote with its items
pub async fn get_quote(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(quote_id): Path<Uuid>,
) -> AppResult<Json<QuoteDetail>> {
    let service = QuoteService::new(state.db, state.config.store.clone());
    let detail = service.get_quote(quote_id).await?;
    Ok(Json(detail))
}

/// List quotes with optional filters
pub async fn list_quotes(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<QuoteFilter>,
) -> AppResult<Json<Vec<Quote>>> {
    let service = QuoteService::new(state.db, state.config.store.clone());
    let quotes = service.list_quotes(filter).await?;
    Ok(Json(quotes))
}

/// Mark a quote as sent
pub async fn send_quote(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(quote_id): Path<Uuid>,
) -> AppResult<Json<QuoteDetail>> {
    transition(state, quote_id, QuoteAction::Send).await
}

/// Accept a sent quote
pub async fn accept_quote(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(quote_id): Path<Uuid>,
) -> AppResult<Json<QuoteDetail>> {
    transition(state, quote_id, QuoteAction::Accept).await
}

/// Reject a sent quote
pub async fn reject_quote(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(quote_id): Path<Uuid>,
) -> AppResult<Json<QuoteDetail>> {
    transition(state, quote_id, QuoteAction::Reject).await
}

async fn transition(
    state: AppState,
    quote_id: Uuid,
    action: QuoteAction,
) -> AppResult<Json<QuoteDetail>> {
    let service = QuoteService::new(state.db, state.config.store.clone());
    let detail = service.transition_quote(quote_id, action).await?;
    Ok(Json(detail))
}
