//! Sequential document number allocation
//!
//! Each document series (one per invoice series code, one per quote
//! year-month) has a row in `document_counters`. Allocation is a single
//! atomic increment-and-fetch: the upsert takes a row lock on the series, so
//! concurrent allocators for the same series serialize and never hand out
//! the same number, while different series proceed in parallel. The bump
//! rolls back with the enclosing transaction, so the allocator itself never
//! creates gaps.

use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};

use crate::error::AppResult;
use shared::{format_invoice_number, format_quote_number, quote_series, InvoiceType};

/// Increment and fetch the counter for a series within the caller's
/// transaction.
pub async fn next_in_series(
    tx: &mut Transaction<'_, Postgres>,
    series_key: &str,
) -> AppResult<i64> {
    let number = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO document_counters (series_key, last_number)
        VALUES ($1, 1)
        ON CONFLICT (series_key)
        DO UPDATE SET last_number = document_counters.last_number + 1
        RETURNING last_number
        "#,
    )
    .bind(series_key)
    .fetch_one(&mut **tx)
    .await?;

    Ok(number)
}

/// Allocate the next invoice number for a type.
///
/// Returns the fixed series code and the zero-padded number.
pub async fn allocate_invoice_number(
    tx: &mut Transaction<'_, Postgres>,
    invoice_type: InvoiceType,
) -> AppResult<(String, String)> {
    let series = invoice_type.series();
    let number = next_in_series(tx, series).await?;
    Ok((series.to_string(), format_invoice_number(number)))
}

/// Allocate the next quote number for the month containing `date`.
pub async fn allocate_quote_number(
    tx: &mut Transaction<'_, Postgres>,
    date: NaiveDate,
) -> AppResult<String> {
    let series = quote_series(date);
    let number = next_in_series(tx, &series).await?;
    Ok(format_quote_number(&series, number))
}
