//! Money calculation utilities using rust_decimal for precision
//!
//! Wire models carry `f64` amounts. All aggregation is done using `Decimal`
//! internally, then converted back to `f64` (rounded to centavos) for display.

use rust_decimal::prelude::*;

use crate::error::{AppError, AppResult, ErrorCode};

/// Rounding precision for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed single amount (₱10,000,000)
const MAX_AMOUNT: f64 = 10_000_000.0;

/// Convert f64 to Decimal; non-finite values become zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Whether two amounts are equal within [`MONEY_TOLERANCE`]
#[inline]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}

/// Validate a user-entered amount: finite, strictly positive, bounded
pub fn require_positive(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be a finite number", field_name),
        )
        .with_detail("field", field_name));
    }
    if value <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be greater than zero", field_name),
        )
        .with_detail("field", field_name));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} exceeds maximum allowed ({})", field_name, MAX_AMOUNT),
        )
        .with_detail("field", field_name));
    }
    Ok(())
}

/// Validate a non-negative amount (cash counts may legitimately be zero)
pub fn require_non_negative(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{} must be zero or more", field_name),
        )
        .with_detail("field", field_name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn test_amounts_match() {
        assert!(amounts_match(to_decimal(500.0), to_decimal(500.004)));
        assert!(!amounts_match(to_decimal(500.0), to_decimal(450.0)));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive(10.0, "amount").is_ok());
        assert_eq!(
            require_positive(0.0, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert_eq!(
            require_positive(f64::INFINITY, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert_eq!(
            require_positive(1e12, "amount").unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative(0.0, "cash").is_ok());
        assert!(require_non_negative(-1.0, "cash").is_err());
    }
}
