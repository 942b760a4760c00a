//! Document number formatting
//!
//! The backend allocates the sequential part atomically; these helpers only
//! render and interpret the human-facing formats:
//!
//! - invoice numbers: 8-digit zero-padded, e.g. `00000042`, paired with a
//!   fixed series code per invoice type (`B001-00000042`)
//! - quote numbers: `COT-YYYYMM-NNNN`, sequential within each year-month

use chrono::{Datelike, NaiveDate};

/// Zero-padded width of invoice numbers.
pub const INVOICE_NUMBER_WIDTH: usize = 8;

/// Zero-padded width of the sequential part of quote numbers.
pub const QUOTE_NUMBER_WIDTH: usize = 4;

/// Render an invoice number, e.g. `1 -> "00000001"`.
pub fn format_invoice_number(n: i64) -> String {
    format!("{:0width$}", n, width = INVOICE_NUMBER_WIDTH)
}

/// Series key for quotes issued on `date`, e.g. `"COT-202406"`.
pub fn quote_series(date: NaiveDate) -> String {
    format!("COT-{:04}{:02}", date.year(), date.month())
}

/// Render a full quote number, e.g. `("COT-202406", 1) -> "COT-202406-0001"`.
pub fn format_quote_number(series: &str, n: i64) -> String {
    format!("{}-{:0width$}", series, n, width = QUOTE_NUMBER_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_numbers_are_eight_digits() {
        assert_eq!(format_invoice_number(1), "00000001");
        assert_eq!(format_invoice_number(42), "00000042");
        assert_eq!(format_invoice_number(12_345_678), "12345678");
    }

    #[test]
    fn quote_series_uses_year_month() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(quote_series(date), "COT-202406");

        let january = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(quote_series(january), "COT-202501");
    }

    #[test]
    fn quote_numbers_pad_to_four_digits() {
        assert_eq!(format_quote_number("COT-202406", 1), "COT-202406-0001");
        assert_eq!(format_quote_number("COT-202406", 2), "COT-202406-0002");
        assert_eq!(format_quote_number("COT-202406", 9999), "COT-202406-9999");
    }
}
