//! Actual/365 Fixed day count convention.

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/365 Fixed day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 365 days (ignoring leap years).
///
/// This is also the basis on which effective interest accrues on
/// amortized cost, whatever convention the deal's coupons use.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date, _frequency: Frequency) -> f64 {
        self.day_count(start, end) as f64 / 365.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn periodic_rate(
        &self,
        annual_rate: f64,
        start: Date,
        end: Date,
        _frequency: Frequency,
    ) -> f64 {
        annual_rate / 365.0 * self.day_count(start, end) as f64
    }
}
