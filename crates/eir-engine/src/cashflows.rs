//! Total cash flow assembly.

use eir_core::rounding::round_currency;

use crate::deal::Structure;

/// Merges principal movements and nominal interest into one signed series.
///
/// Entry 0 is the net outflow at inception, `-principal + capitalized_cost`.
/// Entries `1..=n` are the amounts received: interest only for bullet deals
/// until the last period, which adds the principal; for amortizing deals
/// each entry is one installment plus interest, rounded to cents.
///
/// The result has `n + 1` entries if `nominal_interest` holds `n` values,
/// otherwise it is as long as the interest allows.
///
/// # Example
///
/// ```rust
/// use eir_engine::cashflows::assemble;
/// use eir_engine::deal::Structure;
///
/// let cfs = assemble(1_000.0, 10.0, Structure::Bullet, &[25.0, 25.0], 2);
/// assert_eq!(cfs, vec![-990.0, 25.0, 1_025.0]);
/// ```
#[must_use]
pub fn assemble(
    principal: f64,
    capitalized_cost: f64,
    structure: Structure,
    nominal_interest: &[f64],
    n: usize,
) -> Vec<f64> {
    let interest = &nominal_interest[..n.min(nominal_interest.len())];
    let mut cash_flows = Vec::with_capacity(interest.len() + 1);
    cash_flows.push(-principal + capitalized_cost);

    match structure {
        Structure::Bullet => {
            cash_flows.extend_from_slice(interest);
            if !interest.is_empty() {
                if let Some(last) = cash_flows.last_mut() {
                    *last += principal;
                }
            }
        }
        Structure::Amortizing => {
            let installment = principal / n as f64;
            cash_flows.extend(
                interest
                    .iter()
                    .map(|&interest| round_currency(installment + interest)),
            );
        }
    }

    cash_flows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet() {
        let cfs = assemble(1_000.0, 0.0, Structure::Bullet, &[10.0, 10.0, 10.0], 3);
        assert_eq!(cfs, vec![-1_000.0, 10.0, 10.0, 1_010.0]);
    }

    #[test]
    fn test_bullet_interest_not_rounded() {
        let cfs = assemble(1_000.0, 0.0, Structure::Bullet, &[10.123_456, 10.0], 2);
        assert_eq!(cfs[1], 10.123_456);
    }

    #[test]
    fn test_amortizing_rounds_to_cents() {
        let cfs = assemble(300.0, 3.0, Structure::Amortizing, &[1.234_567, 0.823_4, 0.411_7], 3);

        assert_eq!(cfs[0], -297.0);
        assert_eq!(cfs[1], 101.23);
        assert_eq!(cfs[2], 100.82);
        assert_eq!(cfs[3], 100.41);
    }

    #[test]
    fn test_initial_outflow_is_net_investment() {
        let cfs = assemble(400_000_000.0, 10_000_000.0, Structure::Amortizing, &[1.0; 8], 8);
        assert_eq!(-cfs[0], 390_000_000.0);
        assert_eq!(cfs.len(), 9);
    }

    #[test]
    fn test_no_interest() {
        let cfs = assemble(1_000.0, 0.0, Structure::Bullet, &[], 0);
        assert_eq!(cfs, vec![-1_000.0]);
    }
}
