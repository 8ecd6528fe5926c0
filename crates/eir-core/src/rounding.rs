//! Currency-precision rounding for `f64` amounts.
//!
//! Amounts are carried as `f64` through the engine, but every disclosed
//! figure is rounded to a fixed number of decimal places. Rounding goes
//! through [`Decimal`] so that the decision is taken on the exact binary
//! value of the float, with ties resolved to even.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used for currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Rounds `value` to `dp` decimal places, ties to even.
///
/// Non-finite values and values outside the range of [`Decimal`] are
/// returned unchanged.
///
/// # Example
///
/// ```rust
/// use eir_core::rounding::round_dp;
///
/// assert_eq!(round_dp(1234.5678, 2), 1234.57);
/// assert_eq!(round_dp(0.125, 2), 0.12);
/// ```
#[must_use]
pub fn round_dp(value: f64, dp: u32) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}

/// Rounds an amount to currency precision (2 dp).
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    round_dp(value, CURRENCY_DP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_basic() {
        assert_eq!(round_dp(1.005_1, 2), 1.01);
        assert_eq!(round_dp(-2.346, 2), -2.35);
        assert_eq!(round_currency(390_000_000.0), 390_000_000.0);
    }

    #[test]
    fn test_round_uses_binary_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(round_dp(2.675, 2), 2.67);
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_dp(0.125, 2), 0.12);
        assert_eq!(round_dp(0.375, 2), 0.38);
    }

    #[test]
    fn test_non_finite_passthrough() {
        assert!(round_dp(f64::NAN, 2).is_nan());
        assert_eq!(round_dp(f64::INFINITY, 2), f64::INFINITY);
    }
}
