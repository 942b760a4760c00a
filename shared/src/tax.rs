//! IGV tax calculation
//!
//! All monetary amounts are `rust_decimal::Decimal`, rounded to two decimal
//! places at the boundary so stored totals never accumulate float drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Computed amounts for one line of a sale or quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
}

/// IGV calculator with an injected rate
///
/// The rate comes from configuration at construction time. There is no
/// per-call override.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator {
    rate: Decimal,
}

impl TaxCalculator {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Tax and total for a subtotal. Exempt lines carry zero IGV.
    pub fn compute(&self, subtotal: Decimal, taxable: bool) -> LineAmounts {
        let subtotal = subtotal.round_dp(2);
        let igv = if taxable {
            (subtotal * self.rate).round_dp(2)
        } else {
            Decimal::ZERO
        };
        LineAmounts {
            subtotal,
            igv,
            total: subtotal + igv,
        }
    }

    /// Amounts for a line of `quantity` units at `unit_price` each.
    pub fn line_amounts(&self, quantity: i32, unit_price: Decimal, taxable: bool) -> LineAmounts {
        self.compute(Decimal::from(quantity) * unit_price, taxable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn calculator() -> TaxCalculator {
        TaxCalculator::new(dec("0.18"))
    }

    #[test]
    fn taxable_line_carries_igv() {
        // 3 units at 100.00, 18% IGV
        let amounts = calculator().line_amounts(3, dec("100.00"), true);
        assert_eq!(amounts.subtotal, dec("300.00"));
        assert_eq!(amounts.igv, dec("54.00"));
        assert_eq!(amounts.total, dec("354.00"));
    }

    #[test]
    fn exempt_line_has_zero_igv() {
        let amounts = calculator().line_amounts(2, dec("49.90"), false);
        assert_eq!(amounts.subtotal, dec("99.80"));
        assert_eq!(amounts.igv, Decimal::ZERO);
        assert_eq!(amounts.total, dec("99.80"));
    }

    #[test]
    fn amounts_round_to_two_decimals() {
        // 1 unit at 33.33: igv = 5.9994 -> 6.00
        let amounts = calculator().line_amounts(1, dec("33.33"), true);
        assert_eq!(amounts.igv, dec("6.00"));
        assert_eq!(amounts.total, dec("39.33"));
    }

    #[test]
    fn total_is_subtotal_plus_igv() {
        for (qty, price, taxable) in [(1, "10.00", true), (7, "3.49", true), (4, "25.10", false)] {
            let amounts = calculator().line_amounts(qty, dec(price), taxable);
            assert_eq!(amounts.total, amounts.subtotal + amounts.igv);
        }
    }
}
