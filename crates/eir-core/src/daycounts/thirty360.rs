//! 30/360 day count convention.

use super::DayCount;
use crate::types::{Date, Frequency};

/// 30/360 day count convention.
///
/// Every month counts as 30 days and every year as 360, so a period's
/// accrual depends only on the payment frequency: a semi-annual coupon is
/// always half the annual rate, whatever the actual dates.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Months per Period}}{12}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, _start: Date, _end: Date, frequency: Frequency) -> f64 {
        f64::from(frequency.months_per_period()) / 12.0
    }

    /// Counts days between two dates assuming 30-day months.
    ///
    /// D1 = 31 becomes 30; D2 = 31 becomes 30 when D1 is 30 or more.
    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        if d1 == 31 {
            d1 = 30;
        }
        if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        let years = i64::from(end.year() - start.year());
        let months = i64::from(end.month()) - i64::from(start.month());

        360 * years + 30 * months + (d2 - d1)
    }

    fn periodic_rate(
        &self,
        annual_rate: f64,
        _start: Date,
        _end: Date,
        frequency: Frequency,
    ) -> f64 {
        annual_rate / 12.0 * f64::from(frequency.months_per_period())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thirty360_ignores_dates() {
        let dc = Thirty360;
        // A short stub still accrues a full period
        let start = Date::from_ymd(2021, 4, 7).unwrap();
        let end = Date::from_ymd(2021, 6, 30).unwrap();

        assert_relative_eq!(dc.year_fraction(start, end, Frequency::SemiAnnual), 0.5);
        assert_relative_eq!(dc.year_fraction(start, end, Frequency::Quarterly), 0.25);
        assert_relative_eq!(
            dc.periodic_rate(0.06, start, end, Frequency::Monthly),
            0.06 / 12.0
        );
    }

    #[test]
    fn test_thirty360_day_count() {
        let dc = Thirty360;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();
        assert_eq!(dc.day_count(start, end), 360);

        // 31st is treated as the 30th
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();
        assert_eq!(dc.day_count(start, end), 60);
    }
}
