//! Principal balance profiles.

use crate::deal::Structure;

/// Returns the principal outstanding at the start of each period, plus the
/// balance after the final payment.
///
/// The result has `n + 1` entries. Bullet deals keep the full principal
/// outstanding until maturity; amortizing deals repay it in `n` equal
/// installments. The final entry is always exactly zero.
///
/// # Example
///
/// ```rust
/// use eir_engine::balances::principal_balances;
/// use eir_engine::deal::Structure;
///
/// let balances = principal_balances(Structure::Amortizing, 400.0, 4);
/// assert_eq!(balances, vec![400.0, 300.0, 200.0, 100.0, 0.0]);
/// ```
#[must_use]
pub fn principal_balances(structure: Structure, principal: f64, n: usize) -> Vec<f64> {
    let mut balances: Vec<f64> = match structure {
        Structure::Bullet => vec![principal; n],
        Structure::Amortizing => (0..n)
            .map(|i| principal - i as f64 * principal / n as f64)
            .collect(),
    };
    balances.push(0.0);
    balances
}
