//! Sale engine
//!
//! Orchestrates sale creation and cancellation. Each operation is one
//! transaction spanning item persistence, inventory movements and invoice
//! number allocation; any failure rolls the whole thing back, so a partially
//! created sale is never visible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::services::inventory::apply_movement;
use crate::services::sequence::allocate_invoice_number;
use shared::{
    validate_has_items, validate_quantity, validate_unit_price, Invoice, InvoiceType,
    MovementKind, PaymentMethod, Sale, SaleDetail, SaleItem, SaleStatus, StockWarning,
    TaxCalculator,
};

/// Sale service for creating, cancelling and reading sales
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    store: StoreConfig,
}

/// One requested line of a new sale
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Defaults to the product's current price when omitted
    pub unit_price: Option<Decimal>,
}

/// Input for creating a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub items: Vec<SaleItemInput>,
    #[serde(default)]
    pub invoice_type: InvoiceType,
}

/// A created sale together with any non-fatal stock warnings
#[derive(Debug, Serialize)]
pub struct SaleCreation {
    #[serde(flatten)]
    pub detail: SaleDetail,
    pub warnings: Vec<StockWarning>,
}

/// Filters for listing sales
#[derive(Debug, Default, Deserialize)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub seller: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    client_id: Option<Uuid>,
    seller_id: Option<Uuid>,
    subtotal: Decimal,
    igv: Decimal,
    total: Decimal,
    payment_method: String,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn sale_from_row(row: SaleRow) -> AppResult<Sale> {
    let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
        AppError::Internal(format!("invalid payment method '{}'", row.payment_method))
    })?;
    let status = SaleStatus::parse(&row.status)
        .ok_or_else(|| AppError::Internal(format!("invalid sale status '{}'", row.status)))?;
    Ok(Sale {
        id: row.id,
        client_id: row.client_id,
        seller_id: row.seller_id,
        subtotal: row.subtotal,
        igv: row.igv,
        total: row.total,
        payment_method,
        status,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: Uuid,
    sale_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
    igv: Decimal,
    total: Decimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
            igv: row.igv,
            total: row.total,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    sale_id: Uuid,
    invoice_type: String,
    series: String,
    number: String,
    issued_at: DateTime<Utc>,
}

fn invoice_from_row(row: InvoiceRow) -> AppResult<Invoice> {
    let invoice_type = InvoiceType::parse(&row.invoice_type).ok_or_else(|| {
        AppError::Internal(format!("invalid invoice type '{}'", row.invoice_type))
    })?;
    Ok(Invoice {
        id: row.id,
        sale_id: row.sale_id,
        invoice_type,
        series: row.series,
        number: row.number,
        issued_at: row.issued_at,
    })
}

/// Product fields the engine needs for a line item
#[derive(Debug, sqlx::FromRow)]
struct ProductRef {
    id: Uuid,
    price: Decimal,
    apply_igv: bool,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, store: StoreConfig) -> Self {
        Self { db, store }
    }

    /// Create a sale with its items, inventory movements and invoice.
    ///
    /// An unresolvable product id aborts the whole operation. A product with
    /// no inventory record does not: the sale proceeds and the skipped
    /// adjustment is reported in the returned warnings.
    pub async fn create_sale(
        &self,
        seller_id: Uuid,
        input: CreateSaleInput,
    ) -> AppResult<SaleCreation> {
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
        if input.status == SaleStatus::Cancelled {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: "A sale cannot be created as cancelled".to_string(),
            });
        }

        let calculator = TaxCalculator::new(self.store.igv_rate);
        let mut tx = self.db.begin().await?;

        // Client reference is best effort: an unknown id degrades to a sale
        // without a client rather than an error.
        let client_id = resolve_client(&mut tx, input.client_id).await?;

        let sale_row = sqlx::query_as::<_, SaleRow>(
            r#"
            INSERT INTO sales (client_id, seller_id, payment_method, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, client_id, seller_id, subtotal, igv, total,
                      payment_method, status, notes, created_at, updated_at
            "#,
        )
        .bind(client_id)
        .bind(seller_id)
        .bind(input.payment_method.as_str())
        .bind(input.status.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let sale_id = sale_row.id;
        let mut items = Vec::with_capacity(input.items.len());
        let mut warnings = Vec::new();

        for item in &input.items {
            let product = sqlx::query_as::<_, ProductRef>(
                "SELECT id, price, apply_igv FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Validation {
                field: "items.product_id".to_string(),
                message: format!("Product {} not found", item.product_id),
            })?;

            let unit_price = item.unit_price.unwrap_or(product.price);
            let amounts = calculator.line_amounts(item.quantity, unit_price, product.apply_igv);

            let item_row = sqlx::query_as::<_, SaleItemRow>(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, subtotal, igv, total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, sale_id, product_id, quantity, unit_price, subtotal, igv, total
                "#,
            )
            .bind(sale_id)
            .bind(product.id)
            .bind(item.quantity)
            .bind(unit_price)
            .bind(amounts.subtotal)
            .bind(amounts.igv)
            .bind(amounts.total)
            .fetch_one(&mut *tx)
            .await?;
            items.push(SaleItem::from(item_row));

            let movement = apply_movement(
                &mut tx,
                product.id,
                MovementKind::Out,
                item.quantity,
                &format!("Sale #{}", sale_id),
                Some(seller_id),
                self.store.allow_negative_stock,
            )
            .await;

            match movement {
                Ok(_) => {}
                Err(AppError::NotFound(_)) => {
                    tracing::warn!(
                        product_id = %product.id,
                        %sale_id,
                        "No inventory record for product; stock not adjusted"
                    );
                    warnings.push(StockWarning {
                        product_id: product.id,
                        message: "No inventory record; stock was not adjusted".to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        // Aggregate totals are the sums over the items just written.
        let subtotal: Decimal = items.iter().map(|i| i.subtotal).sum();
        let igv: Decimal = items.iter().map(|i| i.igv).sum();
        let total: Decimal = items.iter().map(|i| i.total).sum();

        let sale_row = sqlx::query_as::<_, SaleRow>(
            r#"
            UPDATE sales
            SET subtotal = $1, igv = $2, total = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, client_id, seller_id, subtotal, igv, total,
                      payment_method, status, notes, created_at, updated_at
            "#,
        )
        .bind(subtotal)
        .bind(igv)
        .bind(total)
        .bind(sale_id)
        .fetch_one(&mut *tx)
        .await?;

        let (series, number) = allocate_invoice_number(&mut tx, input.invoice_type).await?;
        let invoice_row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            INSERT INTO invoices (sale_id, invoice_type, series, number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sale_id, invoice_type, series, number, issued_at
            "#,
        )
        .bind(sale_id)
        .bind(input.invoice_type.as_str())
        .bind(&series)
        .bind(&number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%sale_id, %total, invoice = %format!("{}-{}", series, number), "Sale created");

        Ok(SaleCreation {
            detail: SaleDetail {
                sale: sale_from_row(sale_row)?,
                items,
                invoice: Some(invoice_from_row(invoice_row)?),
            },
            warnings,
        })
    }

    /// Cancel a sale and restore its inventory.
    ///
    /// Items and totals are untouched; the sale keeps its historical record
    /// of what was sold. Cancelling twice fails with Conflict.
    pub async fn cancel_sale(&self, user_id: Uuid, sale_id: Uuid) -> AppResult<SaleDetail> {
        let mut tx = self.db.begin().await?;

        // Lock the sale row so concurrent cancellations serialize.
        let sale_row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, client_id, seller_id, subtotal, igv, total,
                   payment_method, status, notes, created_at, updated_at
            FROM sales WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        if sale_row.status == SaleStatus::Cancelled.as_str() {
            return Err(AppError::Conflict {
                resource: "sale".to_string(),
                message: "Sale is already cancelled".to_string(),
            });
        }

        let items = self.fetch_items(&mut tx, sale_id).await?;

        for item in &items {
            let restored = apply_movement(
                &mut tx,
                item.product_id,
                MovementKind::In,
                item.quantity,
                &format!("Cancellation of sale #{}", sale_id),
                Some(user_id),
                self.store.allow_negative_stock,
            )
            .await;

            match restored {
                Ok(_) => {}
                Err(AppError::NotFound(_)) => {
                    tracing::warn!(
                        product_id = %item.product_id,
                        %sale_id,
                        "No inventory record for product; stock not restored"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let sale_row = sqlx::query_as::<_, SaleRow>(
            r#"
            UPDATE sales
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, client_id, seller_id, subtotal, igv, total,
                      payment_method, status, notes, created_at, updated_at
            "#,
        )
        .bind(SaleStatus::Cancelled.as_str())
        .bind(sale_id)
        .fetch_one(&mut *tx)
        .await?;

        let invoice = self.fetch_invoice(&mut tx, sale_id).await?;

        tx.commit().await?;

        tracing::info!(%sale_id, "Sale cancelled, inventory restored");

        Ok(SaleDetail {
            sale: sale_from_row(sale_row)?,
            items,
            invoice,
        })
    }

    /// Get a sale with its items and invoice
    pub async fn get_sale(&self, sale_id: Uuid) -> AppResult<SaleDetail> {
        let sale_row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, client_id, seller_id, subtotal, igv, total,
                   payment_method, status, notes, created_at, updated_at
            FROM sales WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price, subtotal, igv, total
            FROM sale_items WHERE sale_id = $1 ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(SaleItem::from)
        .collect();

        let invoice = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, sale_id, invoice_type, series, number, issued_at
             FROM invoices WHERE sale_id = $1",
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .map(invoice_from_row)
        .transpose()?;

        Ok(SaleDetail {
            sale: sale_from_row(sale_row)?,
            items,
            invoice,
        })
    }

    /// List sales matching the filter, newest first
    pub async fn list_sales(&self, filter: SaleFilter) -> AppResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, client_id, seller_id, subtotal, igv, total,
                   payment_method, status, notes, created_at, updated_at
            FROM sales
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR payment_method = $2)
              AND ($3::date IS NULL OR created_at::date >= $3)
              AND ($4::date IS NULL OR created_at::date <= $4)
              AND ($5::uuid IS NULL OR seller_id = $5)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.payment_method.map(|m| m.as_str()))
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.seller)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(sale_from_row).collect()
    }

    /// List invoices, optionally by type, newest first
    pub async fn list_invoices(&self, invoice_type: Option<InvoiceType>) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, sale_id, invoice_type, series, number, issued_at
            FROM invoices
            WHERE ($1::text IS NULL OR invoice_type = $1)
            ORDER BY issued_at DESC
            "#,
        )
        .bind(invoice_type.map(|t| t.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(invoice_from_row).collect()
    }

    async fn fetch_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale_id: Uuid,
    ) -> AppResult<Vec<SaleItem>> {
        let rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price, subtotal, igv, total
            FROM sale_items WHERE sale_id = $1 ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(SaleItem::from).collect())
    }

    async fn fetch_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale_id: Uuid,
    ) -> AppResult<Option<Invoice>> {
        sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, sale_id, invoice_type, series, number, issued_at
             FROM invoices WHERE sale_id = $1",
        )
        .bind(sale_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(invoice_from_row)
        .transpose()
    }
}

/// Resolve an optional client reference, tolerating unknown ids.
async fn resolve_client(
    tx: &mut Transaction<'_, Postgres>,
    client_id: Option<Uuid>,
) -> AppResult<Option<Uuid>> {
    let Some(id) = client_id else {
        return Ok(None);
    };

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

    if !exists {
        tracing::warn!(client_id = %id, "Unknown client reference; proceeding without client");
    }

    Ok(exists.then_some(id))
}
