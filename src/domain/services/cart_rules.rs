//! Cart quantity rules shared by every repository implementation.

use crate::domain::errors::{CartError, CartResult};

/// Reject additions that would make a stored quantity negative.
pub fn check_added_quantity(user_id: &str, product_id: &str, quantity: i32) -> CartResult<()> {
    if quantity < 0 {
        return Err(invalid(user_id, product_id, "negative quantity"));
    }
    Ok(())
}

/// New authoritative total for a line: everything currently stored for the
/// pair plus the added amount.
pub fn accumulate(user_id: &str, product_id: &str, current: i64, added: i32) -> CartResult<i32> {
    let total = current + i64::from(added);
    if total < 0 {
        return Err(invalid(user_id, product_id, "negative total"));
    }
    i32::try_from(total).map_err(|_| out_of_range(user_id, product_id))
}

/// Rejection for an addition whose total would not fit the quantity column.
pub fn out_of_range(user_id: &str, product_id: &str) -> CartError {
    invalid(user_id, product_id, "total exceeds column range")
}

fn invalid(user_id: &str, product_id: &str, reason: &'static str) -> CartError {
    CartError::InvalidQuantity {
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_added_quantity() {
        assert!(check_added_quantity("u1", "p1", 0).is_ok());
        assert!(check_added_quantity("u1", "p1", 3).is_ok());
        assert!(matches!(
            check_added_quantity("u1", "p1", -1),
            Err(CartError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_accumulate() {
        assert_eq!(accumulate("u1", "p1", 0, 2).unwrap(), 2);
        assert_eq!(accumulate("u1", "p1", 2, 3).unwrap(), 5);
    }

    #[test]
    fn test_accumulate_overflow() {
        let err = accumulate("u1", "p1", i64::from(i32::MAX), 1).unwrap_err();
        assert_eq!(
            err,
            CartError::InvalidQuantity {
                user_id: "u1".to_string(),
                product_id: "p1".to_string(),
                reason: "total exceeds column range",
            }
        );
    }
}
