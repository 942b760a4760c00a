//! Sale engine tests
//!
//! Pure-logic coverage of the sale pipeline: line amount computation,
//! total aggregation, status handling and payment methods.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{LineAmounts, PaymentMethod, SaleStatus, TaxCalculator};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn igv_calculator() -> TaxCalculator {
    TaxCalculator::new(dec("0.18"))
}

fn aggregate(lines: &[LineAmounts]) -> (Decimal, Decimal, Decimal) {
    let subtotal: Decimal = lines.iter().map(|l| l.subtotal).sum();
    let igv: Decimal = lines.iter().map(|l| l.igv).sum();
    let total: Decimal = lines.iter().map(|l| l.total).sum();
    (subtotal, igv, total)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Sale totals are the sums over the line amounts
    #[test]
    fn test_sale_totals_aggregate_lines() {
        let calc = igv_calculator();
        let lines = vec![
            calc.line_amounts(3, dec("100.00"), true),
            calc.line_amounts(1, dec("50.00"), true),
        ];

        let (subtotal, igv, total) = aggregate(&lines);
        assert_eq!(subtotal, dec("350.00"));
        assert_eq!(igv, dec("63.00"));
        assert_eq!(total, dec("413.00"));
    }

    /// Exempt products contribute zero IGV to the sale
    #[test]
    fn test_mixed_taxable_and_exempt_lines() {
        let calc = igv_calculator();
        let lines = vec![
            calc.line_amounts(2, dec("100.00"), true),
            calc.line_amounts(5, dec("10.00"), false),
        ];

        let (subtotal, igv, total) = aggregate(&lines);
        assert_eq!(subtotal, dec("250.00"));
        assert_eq!(igv, dec("36.00"));
        assert_eq!(total, dec("286.00"));
    }

    /// Empty sale would have zero totals (the service rejects it earlier)
    #[test]
    fn test_empty_lines_sum_to_zero() {
        let (subtotal, igv, total) = aggregate(&[]);
        assert_eq!(subtotal, Decimal::ZERO);
        assert_eq!(igv, Decimal::ZERO);
        assert_eq!(total, Decimal::ZERO);
    }

    /// Default sale status is completed
    #[test]
    fn test_default_sale_status() {
        assert_eq!(SaleStatus::default(), SaleStatus::Completed);
    }

    /// Stored status strings round-trip through parsing
    #[test]
    fn test_sale_status_round_trip() {
        for status in [
            SaleStatus::Pending,
            SaleStatus::Completed,
            SaleStatus::Cancelled,
        ] {
            assert_eq!(SaleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SaleStatus::parse("refunded"), None);
    }

    /// Stored payment method strings round-trip through parsing
    #[test]
    fn test_payment_method_round_trip() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Transfer,
            PaymentMethod::Credit,
        ] {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse("cheque"), None);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    /// Unit price rounding keeps totals at two decimal places
    #[test]
    fn test_line_amounts_round_to_cents() {
        let amounts = igv_calculator().line_amounts(3, dec("33.33"), true);
        assert_eq!(amounts.subtotal, dec("99.99"));
        assert_eq!(amounts.igv, dec("18.00"));
        assert_eq!(amounts.total, dec("117.99"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating unit prices between 0.01 and 1000.00
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating line quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total always equals subtotal plus IGV, per line and per sale
        #[test]
        fn prop_total_is_subtotal_plus_igv(
            lines in prop::collection::vec(
                (quantity_strategy(), price_strategy(), any::<bool>()),
                1..10
            )
        ) {
            let calc = igv_calculator();
            let amounts: Vec<_> = lines
                .iter()
                .map(|(qty, price, taxable)| calc.line_amounts(*qty, *price, *taxable))
                .collect();

            for line in &amounts {
                prop_assert_eq!(line.total, line.subtotal + line.igv);
            }

            let (subtotal, igv, total) = aggregate(&amounts);
            prop_assert_eq!(total, subtotal + igv);
        }

        /// Exempt lines never carry IGV
        #[test]
        fn prop_exempt_lines_have_zero_igv(
            qty in quantity_strategy(),
            price in price_strategy()
        ) {
            let amounts = igv_calculator().line_amounts(qty, price, false);
            prop_assert_eq!(amounts.igv, Decimal::ZERO);
            prop_assert_eq!(amounts.total, amounts.subtotal);
        }

        /// IGV is never negative and never exceeds the subtotal at 18%
        #[test]
        fn prop_igv_bounded_by_rate(
            qty in quantity_strategy(),
            price in price_strategy()
        ) {
            let amounts = igv_calculator().line_amounts(qty, price, true);
            prop_assert!(amounts.igv >= Decimal::ZERO);
            prop_assert!(amounts.igv <= amounts.subtotal);
        }

        /// All stored amounts have at most two decimal places
        #[test]
        fn prop_amounts_are_cent_precision(
            qty in quantity_strategy(),
            price in price_strategy(),
            taxable in any::<bool>()
        ) {
            let amounts = igv_calculator().line_amounts(qty, price, taxable);
            prop_assert_eq!(amounts.subtotal, amounts.subtotal.round_dp(2));
            prop_assert_eq!(amounts.igv, amounts.igv.round_dp(2));
            prop_assert_eq!(amounts.total, amounts.total.round_dp(2));
        }
    }
}
