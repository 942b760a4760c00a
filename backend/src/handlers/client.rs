//! HTTP handlers for client registry endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::client::{ClientFilter, ClientService};
use crate::AppState;
use shared::Client;

/// List clients with optional filters
pub async fn list_clients(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ClientFilter>,
) -> AppResult<Json<Vec<Client>>> {
    let service = ClientService::new(state.db);
    let clients = service.list_clients(filter).await?;
    Ok(Json(clients))
}

/// Get a client by id
pub async fn get_client(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    let client = service.get_client(client_id).await?;
    Ok(Json(client))
}
