//! Client registry read service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{Client, DocumentType};

/// Read-only access to the client registry
#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

/// Filters for listing clients
#[derive(Debug, Default, Deserialize)]
pub struct ClientFilter {
    pub is_active: Option<bool>,
    /// Matches name or document number, case-insensitively
    pub search: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    document_type: String,
    document_number: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn client_from_row(row: ClientRow) -> AppResult<Client> {
    let document_type = DocumentType::parse(&row.document_type).ok_or_else(|| {
        AppError::Internal(format!("invalid document type '{}'", row.document_type))
    })?;
    Ok(Client {
        id: row.id,
        name: row.name,
        document_type,
        document_number: row.document_number,
        email: row.email,
        phone: row.phone,
        address: row.address,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl ClientService {
    /// Create a new ClientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a client by id
    pub async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, document_type, document_number, email, phone, address,
                   is_active, created_at, updated_at
            FROM clients WHERE id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        client_from_row(row)
    }

    /// List clients matching the filter, by name
    pub async fn list_clients(&self, filter: ClientFilter) -> AppResult<Vec<Client>> {
        let search = filter.search.map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, document_type, document_number, email, phone, address,
                   is_active, created_at, updated_at
            FROM clients
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR document_number ILIKE $2)
            ORDER BY name
            "#,
        )
        .bind(filter.is_active)
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(client_from_row).collect()
    }
}
