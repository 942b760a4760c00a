//! Inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MovementKind, StockStatus};

/// Stock record, one per product
///
/// The quantity only ever changes through a movement; the most recent
/// movement's `new_quantity` always equals this record's `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub min_quantity: i32,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Whether stock is at or below the alert threshold.
    ///
    /// `min_quantity` of zero means "no per-product threshold"; the
    /// configured default applies instead.
    pub fn is_low_stock(&self, default_threshold: i32) -> bool {
        let threshold = if self.min_quantity > 0 {
            self.min_quantity
        } else {
            default_threshold
        };
        self.quantity <= threshold
    }

    pub fn stock_status(&self, default_threshold: i32) -> StockStatus {
        if self.quantity <= 0 {
            StockStatus::OutOfStock
        } else if self.is_low_stock(default_threshold) {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// One immutable movement in the audit trail
///
/// Created, never updated or deleted. `quantity` is the delta for In/Out
/// movements and the absolute target for Adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub reason: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
