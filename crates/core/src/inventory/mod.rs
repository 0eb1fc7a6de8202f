//! Inventory movement rules.
//!
//! An inventory transaction carries a free-form type string. Only the exact
//! values `IN` and `OUT` move stock; every other value is stored verbatim
//! and leaves the product's `stock_quantity` untouched.

mod validation;

#[cfg(test)]
mod props;

pub use validation::{InventoryValidationError, validate_movement};

/// Direction of a stock movement, derived from a transaction type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Goods received; stock goes up.
    In,
    /// Goods issued; stock goes down.
    Out,
    /// Any other type (adjustment notes, transfers, ...); no stock effect.
    Other,
}

impl MovementKind {
    /// Classifies a transaction type. Matching is exact and case-sensitive.
    #[must_use]
    pub fn classify(transaction_type: &str) -> Self {
        match transaction_type {
            "IN" => Self::In,
            "OUT" => Self::Out,
            _ => Self::Other,
        }
    }

    /// Signed change to apply to `stock_quantity` for a movement of `quantity`.
    #[must_use]
    pub const fn delta(self, quantity: i32) -> i32 {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
            Self::Other => 0,
        }
    }
}

/// Computes the signed stock delta for a transaction type and quantity.
///
/// `+quantity` for `IN`, `-quantity` for `OUT`, `0` otherwise.
#[must_use]
pub fn stock_delta(transaction_type: &str, quantity: i32) -> i32 {
    MovementKind::classify(transaction_type).delta(quantity)
}
