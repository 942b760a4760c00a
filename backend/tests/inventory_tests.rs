//! Inventory ledger tests
//!
//! Covers movement arithmetic, the audit trail invariant and low-stock
//! classification. `replay` mirrors what `apply_movement` does per row;
//! serialization of concurrent movements is delegated to the `FOR UPDATE`
//! lock on the inventory row and is not exercised here, since these suites
//! run without a database.

use proptest::prelude::*;

use shared::MovementKind;

/// Replays movements the way the ledger does, returning the final quantity
/// and the (previous, new) pair recorded for each movement.
fn replay(start: i32, movements: &[(MovementKind, i32)]) -> (i32, Vec<(i32, i32)>) {
    let mut quantity = start;
    let mut trail = Vec::with_capacity(movements.len());
    for (kind, qty) in movements {
        let previous = quantity;
        quantity = kind.apply(previous, *qty);
        trail.push((previous, quantity));
    }
    (quantity, trail)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use chrono::Utc;
    use shared::{InventoryRecord, StockStatus};
    use uuid::Uuid;

    fn record(quantity: i32, min_quantity: i32) -> InventoryRecord {
        InventoryRecord {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            min_quantity,
            location: None,
            updated_at: Utc::now(),
        }
    }

    /// IN adds, OUT subtracts, ADJUSTMENT replaces
    #[test]
    fn test_movement_kinds() {
        assert_eq!(MovementKind::In.apply(10, 4), 14);
        assert_eq!(MovementKind::Out.apply(10, 4), 6);
        assert_eq!(MovementKind::Adjustment.apply(10, 4), 4);
    }

    /// Selling past zero is representable; the policy check lives elsewhere
    #[test]
    fn test_oversell_is_representable() {
        assert_eq!(MovementKind::Out.apply(2, 5), -3);
    }

    /// Each movement records the quantity before and after
    #[test]
    fn test_audit_trail_pairs() {
        let movements = [
            (MovementKind::In, 20),
            (MovementKind::Out, 5),
            (MovementKind::Adjustment, 50),
            (MovementKind::Out, 10),
        ];
        let (final_quantity, trail) = replay(0, &movements);

        assert_eq!(final_quantity, 40);
        assert_eq!(trail, vec![(0, 20), (20, 15), (15, 50), (50, 40)]);
    }

    /// A sale of N units is one OUT movement of N per product line
    #[test]
    fn test_sale_movement_arithmetic() {
        let (quantity, _) = replay(100, &[(MovementKind::Out, 3)]);
        assert_eq!(quantity, 97);
    }

    /// Cancelling a sale restores exactly what was deducted
    #[test]
    fn test_cancellation_restores_stock() {
        let sold = 7;
        let (after_sale, _) = replay(50, &[(MovementKind::Out, sold)]);
        let (after_cancel, _) = replay(after_sale, &[(MovementKind::In, sold)]);
        assert_eq!(after_cancel, 50);
    }

    /// Stock status thresholds
    #[test]
    fn test_stock_status() {
        assert_eq!(record(0, 0).stock_status(10), StockStatus::OutOfStock);
        assert_eq!(record(3, 5).stock_status(10), StockStatus::LowStock);
        assert_eq!(record(8, 0).stock_status(10), StockStatus::LowStock);
        assert_eq!(record(25, 5).stock_status(10), StockStatus::InStock);
    }

    /// Movement kind strings round-trip
    #[test]
    fn test_movement_kind_round_trip() {
        for kind in [MovementKind::In, MovementKind::Out, MovementKind::Adjustment] {
            assert_eq!(MovementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::parse("transfer"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn kind_strategy() -> impl Strategy<Value = MovementKind> {
        prop_oneof![
            Just(MovementKind::In),
            Just(MovementKind::Out),
            Just(MovementKind::Adjustment),
        ]
    }

    fn movement_strategy() -> impl Strategy<Value = (MovementKind, i32)> {
        (kind_strategy(), 1i32..=1000)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The trail is gapless: each movement's previous quantity equals
        /// the prior movement's new quantity
        #[test]
        fn prop_audit_trail_is_gapless(
            start in 0i32..=10000,
            movements in prop::collection::vec(movement_strategy(), 1..30)
        ) {
            let (final_quantity, trail) = replay(start, &movements);

            prop_assert_eq!(trail[0].0, start);
            for window in trail.windows(2) {
                prop_assert_eq!(window[0].1, window[1].0);
            }
            prop_assert_eq!(trail.last().unwrap().1, final_quantity);
        }

        /// Replaying a sale then its cancellation is a no-op on quantity
        #[test]
        fn prop_sale_cancel_round_trip(
            start in 0i32..=10000,
            sold in 1i32..=1000
        ) {
            let movements = [(MovementKind::Out, sold), (MovementKind::In, sold)];
            let (final_quantity, _) = replay(start, &movements);
            prop_assert_eq!(final_quantity, start);
        }

        /// An adjustment erases history: the result is the target quantity
        #[test]
        fn prop_adjustment_sets_absolute_quantity(
            start in 0i32..=10000,
            prefix in prop::collection::vec(movement_strategy(), 0..10),
            target in 0i32..=1000
        ) {
            let (before, _) = replay(start, &prefix);
            let after = MovementKind::Adjustment.apply(before, target);
            prop_assert_eq!(after, target);
        }
    }
}
