//! Sale and invoice models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{InvoiceType, PaymentMethod, SaleStatus};

/// Sale aggregate root
///
/// Totals equal the sum over the items after recomputation; the aggregate
/// does not recompute automatically when items change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a sale
///
/// Amounts are computed at creation from the snapshot unit price and never
/// independently mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
}

/// Receipt issued for a sale, 1:1
///
/// `(series, number)` is globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub invoice_type: InvoiceType,
    pub series: String,
    pub number: String,
    pub issued_at: DateTime<Utc>,
}

/// A sale with its items and invoice, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub invoice: Option<Invoice>,
}

/// Non-fatal problem encountered while creating a sale
///
/// Today the only case is a product with no inventory record: the sale
/// succeeds but no stock was decremented for that item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockWarning {
    pub product_id: Uuid,
    pub message: String,
}
