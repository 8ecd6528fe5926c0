//! Actual/Actual day count convention, anchored variant.

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/Actual day count convention with an anchored leap-year test.
///
/// The numerator is the actual number of days. The denominator is 366
/// when the calendar year the period principally falls in is a leap year,
/// and 365 otherwise. A period starting in January or February is anchored
/// to its start year; any later start is anchored to its end year.
///
/// This approximates ACT/ACT ISDA without splitting the period at year
/// boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActAct;

impl ActAct {
    /// Returns the year basis (365 or 366) for the period.
    #[must_use]
    pub fn basis(start: Date, end: Date) -> u32 {
        let anchor = if start.month() < 3 { start } else { end };
        if anchor.is_leap_year() {
            366
        } else {
            365
        }
    }
}

impl DayCount for ActAct {
    fn name(&self) -> &'static str {
        "ACT/ACT"
    }

    fn year_fraction(&self, start: Date, end: Date, _frequency: Frequency) -> f64 {
        self.day_count(start, end) as f64 / f64::from(Self::basis(start, end))
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
        annual_rate / f64::from(Self::basis(start, end)) * self.day_count(start, end) as f64
    }
}
