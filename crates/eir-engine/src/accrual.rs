//! Nominal interest accrual and rate reset expansion.
//!
//! A reset dated on schedule date `j` fixes the rate of the accrual period
//! that ends on that date (coupon index `j - 1`) and of every later period
//! until the next reset.

use eir_core::daycounts::DayCountConvention;
use eir_core::{Date, Frequency};

use crate::deal::RateReset;

/// Returns the nominal interest of each accrual period.
///
/// Period `i` accrues `balances[i]` at `rates[i]` from `dates[i]` to
/// `dates[i + 1]` under `convention`. At most `n` periods are produced; fewer
/// if `dates`, `rates` or `balances` run out first. Amounts are not rounded.
///
/// # Example
///
/// ```rust
/// use eir_core::daycounts::DayCountConvention;
/// use eir_core::{Date, Frequency};
/// use eir_engine::accrual::accrue;
///
/// let dates = [
///     Date::from_ymd(2024, 1, 1).unwrap(),
///     Date::from_ymd(2024, 7, 1).unwrap(),
/// ];
/// let interest = accrue(
///     &dates,
///     &[0.06],
///     DayCountConvention::Thirty360,
///     Frequency::SemiAnnual,
///     &[1_000.0, 0.0],
///     1,
/// );
/// assert!((interest[0] - 30.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn accrue(
    dates: &[Date],
    rates: &[f64],
    convention: DayCountConvention,
    frequency: Frequency,
    balances: &[f64],
    n: usize,
) -> Vec<f64> {
    let day_count = convention.to_day_count();
    dates
        .windows(2)
        .zip(rates)
        .zip(balances)
        .take(n)
        .map(|((period, &rate), &balance)| {
            balance * day_count.periodic_rate(rate, period[0], period[1], frequency)
        })
        .collect()
}

/// Returns the coupon index each reset takes effect from.
///
/// Resets whose date is not a schedule date after the start are skipped;
/// [`Deal`](crate::deal::Deal) construction rejects those, so for a deal the
/// result has one index per reset.
#[must_use]
pub fn reset_coupon_indices(resets: &[RateReset], dates: &[Date]) -> Vec<usize> {
    resets
        .iter()
        .filter_map(|reset| match dates.binary_search(&reset.date) {
            Ok(j) if j > 0 => Some(j - 1),
            _ => None,
        })
        .collect()
}

/// Expands a reset sequence into one rate per accrual period.
///
/// Periods before the first reset take the first reset's rate. Returns an
/// empty vector when there are no resets.
#[must_use]
pub fn period_rates(resets: &[RateReset], dates: &[Date]) -> Vec<f64> {
    let periods = dates.len().saturating_sub(1);
    let Some(first) = resets.first() else {
        return Vec::new();
    };

    let mut rates = vec![first.rate; periods];
    for reset in resets {
        if let Ok(j) = dates.binary_search(&reset.date) {
            if j > 0 {
                for rate in rates.iter_mut().skip(j - 1) {
                    *rate = reset.rate;
                }
            }
        }
    }
    rates
}
