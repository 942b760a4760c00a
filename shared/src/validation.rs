//! Validation helpers shared by the transaction engines

use rust_decimal::Decimal;

/// Line quantities must be strictly positive integers.
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Unit prices may be zero (giveaways) but never negative.
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// A sale or quote needs at least one line item.
pub fn validate_has_items(count: usize) -> Result<(), &'static str> {
    if count == 0 {
        return Err("At least one item is required");
    }
    Ok(())
}
