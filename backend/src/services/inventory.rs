//! Inventory ledger service
//!
//! Owns per-product stock quantities and the append-only movement trail.
//! Every change to a quantity goes through [`apply_movement`], which locks
//! the inventory row, computes the new quantity for the movement kind, and
//! persists the updated record together with exactly one movement — both in
//! the caller's transaction, so they commit or roll back together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use shared::{InventoryMovement, InventoryRecord, MovementKind, StockStatus};

/// Inventory service for stock adjustments and read queries
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
    store: StoreConfig,
}

/// Database row for an inventory record
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    min_quantity: i32,
    location: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryRecord {
    fn from(row: InventoryRow) -> Self {
        InventoryRecord {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            min_quantity: row.min_quantity,
            location: row.location,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a movement
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    inventory_id: Uuid,
    kind: String,
    quantity: i32,
    previous_quantity: i32,
    new_quantity: i32,
    reason: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

fn movement_from_row(row: MovementRow) -> AppResult<InventoryMovement> {
    let kind = MovementKind::parse(&row.kind)
        .ok_or_else(|| AppError::Internal(format!("invalid movement kind '{}'", row.kind)))?;
    Ok(InventoryMovement {
        id: row.id,
        inventory_id: row.inventory_id,
        kind,
        quantity: row.quantity,
        previous_quantity: row.previous_quantity,
        new_quantity: row.new_quantity,
        reason: row.reason,
        user_id: row.user_id,
        created_at: row.created_at,
    })
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub kind: MovementKind,
    pub quantity: i32,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Inventory record with product identification and derived stock status
#[derive(Debug, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub record: InventoryRecord,
    pub product_name: String,
    pub product_sku: String,
    pub stock_status: StockStatus,
}

#[derive(Debug, sqlx::FromRow)]
struct InventoryViewRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i32,
    min_quantity: i32,
    location: Option<String>,
    updated_at: DateTime<Utc>,
    product_name: String,
    product_sku: String,
}

/// Apply one movement to a product's inventory inside `tx`.
///
/// Locks the inventory row with `FOR UPDATE` so concurrent movements against
/// the same product serialize their read-modify-write. Fails with NotFound
/// when the product has no inventory record; callers decide whether that is
/// fatal. When `allow_negative_stock` is false, an OUT movement that would
/// drive the quantity below zero fails with Conflict.
pub async fn apply_movement(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    kind: MovementKind,
    quantity: i32,
    reason: &str,
    user_id: Option<Uuid>,
    allow_negative_stock: bool,
) -> AppResult<(InventoryRecord, InventoryMovement)> {
    match kind {
        MovementKind::In | MovementKind::Out => {
            if quantity <= 0 {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Movement quantity must be positive".to_string(),
                });
            }
        }
        MovementKind::Adjustment => {
            // Absolute target; negative targets are as meaningless as they
            // are for Out when oversell is disabled.
            if !allow_negative_stock && quantity < 0 {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Adjusted quantity cannot be negative".to_string(),
                });
            }
        }
    }

    let row = sqlx::query_as::<_, InventoryRow>(
        "SELECT id, product_id, quantity, min_quantity, location, updated_at
         FROM inventory WHERE product_id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Inventory record".to_string()))?;

    let previous_quantity = row.quantity;
    let new_quantity = kind.apply(previous_quantity, quantity);

    if !allow_negative_stock && new_quantity < 0 {
        return Err(AppError::Conflict {
            resource: "inventory".to_string(),
            message: format!(
                "Movement would drive stock below zero ({} -> {})",
                previous_quantity, new_quantity
            ),
        });
    }

    let updated = sqlx::query_as::<_, InventoryRow>(
        r#"
        UPDATE inventory
        SET quantity = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, product_id, quantity, min_quantity, location, updated_at
        "#,
    )
    .bind(new_quantity)
    .bind(row.id)
    .fetch_one(&mut **tx)
    .await?;

    let movement = sqlx::query_as::<_, MovementRow>(
        r#"
        INSERT INTO inventory_movements
            (inventory_id, kind, quantity, previous_quantity, new_quantity, reason, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, inventory_id, kind, quantity, previous_quantity, new_quantity,
                  reason, user_id, created_at
        "#,
    )
    .bind(row.id)
    .bind(kind.as_str())
    .bind(quantity)
    .bind(previous_quantity)
    .bind(new_quantity)
    .bind(reason)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    tracing::debug!(
        %product_id,
        kind = kind.as_str(),
        previous_quantity,
        new_quantity,
        "Applied inventory movement"
    );

    Ok((updated.into(), movement_from_row(movement)?))
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool, store: StoreConfig) -> Self {
        Self { db, store }
    }

    /// Adjust stock for a product with a manual movement.
    ///
    /// One transaction covering the record update and the movement insert.
    pub async fn adjust(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<InventoryRecord> {
        let mut tx = self.db.begin().await?;

        let reason = input.reason.unwrap_or_default();
        let (record, _movement) = apply_movement(
            &mut tx,
            product_id,
            input.kind,
            input.quantity,
            &reason,
            Some(user_id),
            self.store.allow_negative_stock,
        )
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Get the inventory record for a product
    pub async fn get_by_product(&self, product_id: Uuid) -> AppResult<InventoryView> {
        let row = sqlx::query_as::<_, InventoryViewRow>(
            r#"
            SELECT i.id, i.product_id, i.quantity, i.min_quantity, i.location, i.updated_at,
                   p.name AS product_name, p.sku AS product_sku
            FROM inventory i
            JOIN products p ON p.id = i.product_id
            WHERE i.product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory record".to_string()))?;

        Ok(self.view_from_row(row))
    }

    /// List all inventory records with derived stock status
    pub async fn list(&self) -> AppResult<Vec<InventoryView>> {
        let rows = sqlx::query_as::<_, InventoryViewRow>(
            r#"
            SELECT i.id, i.product_id, i.quantity, i.min_quantity, i.location, i.updated_at,
                   p.name AS product_name, p.sku AS product_sku
            FROM inventory i
            JOIN products p ON p.id = i.product_id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| self.view_from_row(r)).collect())
    }

    /// List records at or below their low-stock threshold
    pub async fn low_stock(&self) -> AppResult<Vec<InventoryView>> {
        let rows = sqlx::query_as::<_, InventoryViewRow>(
            r#"
            SELECT i.id, i.product_id, i.quantity, i.min_quantity, i.location, i.updated_at,
                   p.name AS product_name, p.sku AS product_sku
            FROM inventory i
            JOIN products p ON p.id = i.product_id
            WHERE i.quantity <= CASE WHEN i.min_quantity > 0 THEN i.min_quantity ELSE $1 END
            ORDER BY i.quantity
            "#,
        )
        .bind(self.store.low_stock_threshold)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| self.view_from_row(r)).collect())
    }

    /// Movement history, newest first, capped at 100 rows
    pub async fn movements(&self) -> AppResult<Vec<InventoryMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, inventory_id, kind, quantity, previous_quantity, new_quantity,
                   reason, user_id, created_at
            FROM inventory_movements
            ORDER BY created_at DESC
            LIMIT 100
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    /// Movement history for one product, newest first
    pub async fn movements_for_product(
        &self,
        product_id: Uuid,
    ) -> AppResult<Vec<InventoryMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT m.id, m.inventory_id, m.kind, m.quantity, m.previous_quantity,
                   m.new_quantity, m.reason, m.user_id, m.created_at
            FROM inventory_movements m
            JOIN inventory i ON i.id = m.inventory_id
            WHERE i.product_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(movement_from_row).collect()
    }

    fn view_from_row(&self, row: InventoryViewRow) -> InventoryView {
        let record = InventoryRecord {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            min_quantity: row.min_quantity,
            location: row.location,
            updated_at: row.updated_at,
        };
        let stock_status = record.stock_status(self.store.low_stock_threshold);
        InventoryView {
            record,
            product_name: row.product_name,
            product_sku: row.product_sku,
            stock_status,
        }
    }
}
