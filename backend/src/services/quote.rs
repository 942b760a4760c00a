//! Quote engine
//!
//! Quotes mirror the structure of sales but never touch inventory and never
//! carry an invoice. Creation allocates a month-scoped quote number from the
//! same counter table the invoice allocator uses; the lifecycle is enforced
//! server-side through explicit transition actions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::services::sequence::allocate_quote_number;
use shared::{
    validate_has_items, validate_quantity, validate_unit_price, Quote, QuoteAction, QuoteDetail,
    QuoteItem, QuoteStatus, TaxCalculator,
};

/// Quote service for drafting quotes and driving their lifecycle
#[derive(Clone)]
pub struct QuoteService {
    db: PgPool,
    store: StoreConfig,
}

/// One requested line of a new quote
#[derive(Debug, Deserialize)]
pub struct QuoteItemInput {
    pub product_id: Uuid,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

/// Input for creating a quote
#[derive(Debug, Deserialize)]
pub struct CreateQuoteInput {
    pub client_id: Option<Uuid>,
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub items: Vec<QuoteItemInput>,
}

/// Filters for listing quotes
#[derive(Debug, Default, Deserialize)]
pub struct QuoteFilter {
    pub status: Option<QuoteStatus>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: Uuid,
    client_id: Option<Uuid>,
    user_id: Option<Uuid>,
    quote_number: String,
    subtotal: Decimal,
    igv: Decimal,
    total: Decimal,
    status: String,
    valid_until: Option<NaiveDate>,
    notes: Option<String>,
    terms: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn quote_from_row(row: QuoteRow) -> AppResult<Quote> {
    let status = QuoteStatus::parse(&row.status)
        .ok_or_else(|| AppError::Internal(format!("invalid quote status '{}'", row.status)))?;
    Ok(Quote {
        id: row.id,
        client_id: row.client_id,
        user_id: row.user_id,
        quote_number: row.quote_number,
        subtotal: row.subtotal,
        igv: row.igv,
        total: row.total,
        status,
        valid_until: row.valid_until,
        notes: row.notes,
        terms: row.terms,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteItemRow {
    id: Uuid,
    quote_id: Uuid,
    product_id: Uuid,
    description: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
    igv: Decimal,
    total: Decimal,
}

impl From<QuoteItemRow> for QuoteItem {
    fn from(row: QuoteItemRow) -> Self {
        QuoteItem {
            id: row.id,
            quote_id: row.quote_id,
            product_id: row.product_id,
            description: row.description,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
            igv: row.igv,
            total: row.total,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuoteProductRef {
    id: Uuid,
    name: String,
    price: Decimal,
    apply_igv: bool,
}

impl QuoteService {
    /// Create a new QuoteService instance
    pub fn new(db: PgPool, store: StoreConfig) -> Self {
        Self { db, store }
    }

    /// Create a quote in Draft status with a freshly allocated number.
    pub async fn create_quote(
        &self,
        user_id: Uuid,
        input: CreateQuoteInput,
    ) -> AppResult<QuoteDetail> {
        validate_has_items(input.items.len()).map_err(|msg| AppError::Validation {
            field: "items".to_string(),
            message: msg.to_string(),
        })?;
        for item in &input.items {
            validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "items.quantity".to_string(),
                message: msg.to_string(),
            })?;
            if let Some(price) = item.unit_price {
                validate_unit_price(price).map_err(|msg| AppError::Validation {
                    field: "items.unit_price".to_string(),
                    message: msg.to_string(),
                })?;
            }
        }

        let calculator = TaxCalculator::new(self.store.igv_rate);
        let mut tx = self.db.begin().await?;

        let quote_number = allocate_quote_number(&mut tx, Utc::now().date_naive()).await?;

        let quote_row = sqlx::query_as::<_, QuoteRow>(
            r#"
            INSERT INTO quotes (client_id, user_id, quote_number, status, valid_until, notes, terms)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, client_id, user_id, quote_number, subtotal, igv, total,
                      status, valid_until, notes, terms, created_at, updated_at
            "#,
        )
        .bind(input.client_id)
        .bind(user_id)
        .bind(&quote_number)
        .bind(QuoteStatus::Draft.as_str())
        .bind(input.valid_until)
        .bind(&input.notes)
        .bind(&input.terms)
        .fetch_one(&mut *tx)
        .await?;

        let quote_id = quote_row.id;
        let mut items = Vec::with_capacity(input.items.len());

        for item in &input.items {
            let product = sqlx::query_as::<_, QuoteProductRef>(
                "SELECT id, name, price, apply_igv FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Validation {
                field: "items.product_id".to_string(),
                message: format!("Product {} not found", item.product_id),
            })?;

            let unit_price = item.unit_price.unwrap_or(product.price);
            let description = item.description.clone().unwrap_or(product.name);
            let amounts = calculator.line_amounts(item.quantity, unit_price, product.apply_igv);

            let item_row = sqlx::query_as::<_, QuoteItemRow>(
                r#"
                INSERT INTO quote_items
                    (quote_id, product_id, description, quantity, unit_price, subtotal, igv, total)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, quote_id, product_id, description, quantity, unit_price,
                          subtotal, igv, total
                "#,
            )
            .bind(quote_id)
            .bind(product.id)
            .bind(description)
            .bind(item.quantity)
            .bind(unit_price)
            .bind(amounts.subtotal)
            .bind(amounts.igv)
            .bind(amounts.total)
            .fetch_one(&mut *tx)
            .await?;
            items.push(QuoteItem::from(item_row));
        }

        let subtotal: Decimal = items.iter().map(|i| i.subtotal).sum();
        let igv: Decimal = items.iter().map(|i| i.igv).sum();
        let total: Decimal = items.iter().map(|i| i.total).sum();

        let quote_row = sqlx::query_as::<_, QuoteRow>(
            r#"
            UPDATE quotes
            SET subtotal = $1, igv = $2, total = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, client_id, user_id, quote_number, subtotal, igv, total,
                      status, valid_until, notes, terms, created_at, updated_at
            "#,
        )
        .bind(subtotal)
        .bind(igv)
        .bind(total)
        .bind(quote_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%quote_id, %quote_number, %total, "Quote created");

        Ok(QuoteDetail {
            quote: quote_from_row(quote_row)?,
            items,
        })
    }

    /// Apply a lifecycle action to a quote.
    ///
    /// The quote row is locked for the duration, so two racing actions see
    /// each other's result and the second one fails cleanly on an illegal
    /// transition.
    pub async fn transition_quote(
        &self,
        quote_id: Uuid,
        action: QuoteAction,
    ) -> AppResult<QuoteDetail> {
        let mut tx = self.db.begin().await?;

        let quote_row = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT id, client_id, user_id, quote_number, subtotal, igv, total,
                   status, valid_until, notes, terms, created_at, updated_at
            FROM quotes WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(quote_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote".to_string()))?;

        let current = QuoteStatus::parse(&quote_row.status)
            .ok_or_else(|| AppError::Internal(format!("invalid quote status '{}'", quote_row.status)))?;
        let next = action.target_status();

        if !current.can_transition_to(next) {
            return Err(AppError::Conflict {
                resource: "quote".to_string(),
                message: format!(
                    "Cannot move quote from {} to {}",
                    current.as_str(),
                    next.as_str()
                ),
            });
        }

        let quote_row = sqlx::query_as::<_, QuoteRow>(
            r#"
            UPDATE quotes
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, client_id, user_id, quote_number, subtotal, igv, total,
                      status, valid_until, notes, terms, created_at, updated_at
            "#,
        )
        .bind(next.as_str())
        .bind(quote_id)
        .fetch_one(&mut *tx)
        .await?;

        let items = fetch_items(&mut tx, quote_id).await?;

        tx.commit().await?;

        tracing::info!(%quote_id, from = current.as_str(), to = next.as_str(), "Quote transitioned");

        Ok(QuoteDetail {
            quote: quote_from_row(quote_row)?,
            items,
        })
    }

    /// Get a quote with its items
    pub async fn get_quote(&self, quote_id: Uuid) -> AppResult<QuoteDetail> {
        let quote_row = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT id, client_id, user_id, quote_number, subtotal, igv, total,
                   status, valid_until, notes, terms, created_at, updated_at
            FROM quotes WHERE id = $1
            "#,
        )
        .bind(quote_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote".to_string()))?;

        let items = sqlx::query_as::<_, QuoteItemRow>(
            r#"
            SELECT id, quote_id, product_id, description, quantity, unit_price,
                   subtotal, igv, total
            FROM quote_items WHERE quote_id = $1 ORDER BY created_at
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(QuoteItem::from)
        .collect();

        Ok(QuoteDetail {
            quote: quote_from_row(quote_row)?,
            items,
        })
    }

    /// List quotes matching the filter, newest first
    pub async fn list_quotes(&self, filter: QuoteFilter) -> AppResult<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT id, client_id, user_id, quote_number, subtotal, igv, total,
                   status, valid_until, notes, terms, created_at, updated_at
            FROM quotes
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.client_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(quote_from_row).collect()
    }
}

async fn fetch_items(
    tx: &mut Transaction<'_, Postgres>,
    quote_id: Uuid,
) -> AppResult<Vec<QuoteItem>> {
    let rows = sqlx::query_as::<_, QuoteItemRow>(
        r#"
        SELECT id, quote_id, product_id, description, quantity, unit_price,
               subtotal, igv, total
        FROM quote_items WHERE quote_id = $1 ORDER BY created_at
        "#,
    )
    .bind(quote_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(QuoteItem::from).collect())
}
