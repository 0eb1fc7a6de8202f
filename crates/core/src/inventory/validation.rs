//! Presence checks for inventory transaction input.

use thiserror::Error;
use uuid::Uuid;

/// Validation errors for an inventory transaction request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryValidationError {
    /// Product reference or transaction type missing.
    #[error("Product ID and transaction type are required")]
    MissingFields,

    /// Quantity is a magnitude; the type carries the sign.
    #[error("Quantity must not be negative")]
    NegativeQuantity,
}

/// Validates an inventory transaction request before it reaches the writer.
///
/// Returns the product id on success so callers can use it unwrapped.
///
/// # Errors
///
/// Returns an error if the product id or type is missing, or the quantity
/// is negative.
pub fn validate_movement(
    product_id: Option<Uuid>,
    transaction_type: &str,
    quantity: i32,
) -> Result<Uuid, InventoryValidationError> {
    let product_id = match product_id {
        Some(id) if !id.is_nil() && !transaction_type.trim().is_empty() => id,
        _ => return Err(InventoryValidationError::MissingFields),
    };

    if quantity < 0 {
        return Err(InventoryValidationError::NegativeQuantity);
    }

    Ok(product_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_movement() {
        let id = Uuid::new_v4();
        assert_eq!(validate_movement(Some(id), "IN", 10), Ok(id));
        assert_eq!(validate_movement(Some(id), "COUNT", 0), Ok(id));
    }

    #[test]
    fn test_missing_product() {
        assert_eq!(
            validate_movement(None, "IN", 1),
            Err(InventoryValidationError::MissingFields)
        );
        assert_eq!(
            validate_movement(Some(Uuid::nil()), "IN", 1),
            Err(InventoryValidationError::MissingFields)
        );
    }

    #[test]
    fn test_missing_type() {
        assert_eq!(
            validate_movement(Some(Uuid::new_v4()), "  ", 1),
            Err(InventoryValidationError::MissingFields)
        );
    }

    #[test]
    fn test_negative_quantity() {
        assert_eq!(
            validate_movement(Some(Uuid::new_v4()), "OUT", -1),
            Err(InventoryValidationError::NegativeQuantity)
        );
    }
}
