//! Actual/360 day count convention.

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/360 day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 360 days.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{360}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date, _frequency: Frequency) -> f64 {
        self.day_count(start, end) as f64 / 360.0
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
        annual_rate / 360.0 * self.day_count(start, end) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_act360_basic() {
        let dc = Act360;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 4, 1).unwrap();

        // Jan has 31, Feb has 28, Mar has 31 = 90 days
        assert_eq!(dc.day_count(start, end), 90);
        assert_relative_eq!(dc.year_fraction(start, end, Frequency::Quarterly), 0.25);
    }

    #[test]
    fn test_act360_full_year_exceeds_one() {
        let dc = Act360;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_relative_eq!(dc.year_fraction(start, end, Frequency::Annual), 365.0 / 360.0);
    }

    #[test]
    fn test_act360_periodic_rate() {
        let dc = Act360;
        let start = Date::from_ymd(2021, 4, 7).unwrap();
        let end = Date::from_ymd(2021, 10, 7).unwrap();

        let rate = dc.periodic_rate(0.0546, start, end, Frequency::SemiAnnual);
        assert_relative_eq!(rate, 0.0546 / 360.0 * 183.0);
    }
}
