//! Quote models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::QuoteStatus;

/// Quote aggregate root
///
/// Structurally parallel to a sale but with no inventory linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub quote_number: String,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub product_id: Uuid,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
}

/// A quote with its items, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}
