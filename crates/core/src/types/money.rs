//! Money conversion helpers.
//!
//! Prices are stored as `rust_decimal::Decimal` in the currency's standard
//! unit (dollars). The payment processor wants integer cents, so the
//! checkout path converts at the boundary.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Convert a decimal price to integer cents, rounding to the nearest
/// cent (midpoints round to even).
///
/// Returns `None` if the amount is negative or does not fit in `i64`
/// (both indicate corrupt catalog data rather than a real price).
#[must_use]
pub fn to_cents(amount: Decimal) -> Option<i64> {
    if amount.is_sign_negative() {
        return None;
    }
    let cents = (amount * Decimal::ONE_HUNDRED).round();
    cents.to_i64()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_to_cents_whole_dollars() {
        assert_eq!(to_cents(Decimal::new(1999, 2)), Some(1999));
        assert_eq!(to_cents(Decimal::from(5)), Some(500));
    }

    #[test]
    fn test_to_cents_rounds_sub_cent() {
        // 1000.5 cents is a midpoint and rounds to even
        assert_eq!(to_cents(Decimal::new(10005, 3)), Some(1000));
        assert_eq!(to_cents(Decimal::new(10006, 3)), Some(1001));
    }

    #[test]
    fn test_to_cents_zero() {
        assert_eq!(to_cents(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_to_cents_negative_rejected() {
        assert_eq!(to_cents(Decimal::new(-100, 2)), None);
    }
}
