//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
///
/// Read-only from the transaction engines: sales and quotes resolve products
/// by id and snapshot the price onto their line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub cost: Decimal,
    /// Whether IGV applies to this product
    pub apply_igv: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Unit price with IGV included, for display purposes.
    pub fn price_with_igv(&self, igv_rate: Decimal) -> Decimal {
        if self.apply_igv {
            (self.price * (Decimal::ONE + igv_rate)).round_dp(2)
        } else {
            self.price
        }
    }
}

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
