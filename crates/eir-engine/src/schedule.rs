//! Payment date generation.
//!
//! A schedule runs from the start date through a first payment date (which
//! may leave an irregular stub period) and then steps forward a fixed number
//! of months at a time until the next step would pass the end date.

use eir_core::Date;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// Ordered payment dates of a deal, period 0 being the start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaymentSchedule {
    dates: Vec<Date>,
}

impl PaymentSchedule {
    /// Returns all dates, start date first.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the number of payments, excluding period 0.
    #[must_use]
    pub fn number_of_payments(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }

    /// Returns the start date.
    #[must_use]
    pub fn start(&self) -> Date {
        self.dates[0]
    }

    /// Returns the last payment date.
    #[must_use]
    pub fn last(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Returns the index of `date` in the schedule, if it is a schedule date.
    #[must_use]
    pub fn position(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Returns true if `date` is one of the schedule dates.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.position(date).is_some()
    }

    /// Returns the number of days in accrual period `i` (from date `i` to date `i + 1`).
    #[must_use]
    pub fn period_days(&self, i: usize) -> i64 {
        self.dates[i].days_between(&self.dates[i + 1])
    }
}

/// Generates the payment dates of a deal.
///
/// The first two dates are `start` and `first_payment`; later dates are
/// `frequency_months` after the previous one, for as long as they do not
/// exceed `end`. Day-of-month overflow rolls back to the month end, and the
/// rolled day carries into later dates.
///
/// Whether the last generated date equals `end` is left to the caller.
///
/// # Errors
///
/// Returns `EngineError::InvalidSchedule` if `first_payment` is not after
/// `start` or `frequency_months` is zero.
///
/// # Example
///
/// ```rust
/// use eir_core::Date;
/// use eir_engine::schedule::generate_schedule;
///
/// let schedule = generate_schedule(
///     Date::from_ymd(2021, 4, 7).unwrap(),
///     Date::from_ymd(2025, 4, 7).unwrap(),
///     Date::from_ymd(2021, 10, 7).unwrap(),
///     6,
/// )
/// .unwrap();
///
/// assert_eq!(schedule.number_of_payments(), 8);
/// assert_eq!(schedule.last(), Date::from_ymd(2025, 4, 7).unwrap());
/// ```
pub fn generate_schedule(
    start: Date,
    end: Date,
    first_payment: Date,
    frequency_months: u32,
) -> EngineResult<PaymentSchedule> {
    if first_payment <= start {
        return Err(EngineError::invalid_schedule(format!(
            "first payment date {first_payment} must be after start date {start}"
        )));
    }
    if frequency_months == 0 {
        return Err(EngineError::invalid_schedule(
            "payment frequency must be at least one month",
        ));
    }
    let step = i32::try_from(frequency_months).map_err(|_| {
        EngineError::invalid_schedule(format!(
            "frequency of {frequency_months} months is too large"
        ))
    })?;

    let mut dates = vec![start, first_payment];
    let mut current = first_payment;
    loop {
        let next = current.add_months(step)?;
        if next > end {
            break;
        }
        dates.push(next);
        current = next;
    }

    Ok(PaymentSchedule { dates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_semi_annual_schedule() {
        let schedule =
            generate_schedule(date(2021, 4, 7), date(2025, 4, 7), date(2021, 10, 7), 6).unwrap();

        assert_eq!(schedule.number_of_payments(), 8);
        assert_eq!(schedule.dates().len(), 9);
        assert_eq!(schedule.start(), date(2021, 4, 7));
        assert_eq!(schedule.dates()[1], date(2021, 10, 7));
        assert_eq!(schedule.dates()[2], date(2022, 4, 7));
        assert_eq!(schedule.last(), date(2025, 4, 7));
    }

    #[test]
    fn test_stub_period() {
        // Short first period, then quarterly
        let schedule =
            generate_schedule(date(2022, 1, 15), date(2022, 12, 31), date(2022, 3, 31), 3).unwrap();

        assert_eq!(
            schedule.dates(),
            &[
                date(2022, 1, 15),
                date(2022, 3, 31),
                date(2022, 6, 30),
                date(2022, 9, 30),
                date(2022, 12, 30),
            ]
        );
        // The rolled-back day carries forward, so the end date is missed
        assert_ne!(schedule.last(), date(2022, 12, 31));
    }

    #[test]
    fn test_stops_before_end() {
        let schedule =
            generate_schedule(date(2021, 1, 1), date(2021, 12, 15), date(2021, 7, 1), 6).unwrap();
        assert_eq!(schedule.dates(), &[date(2021, 1, 1), date(2021, 7, 1)]);
        assert_eq!(schedule.number_of_payments(), 1);
    }

    #[test]
    fn test_strictly_increasing() {
        let schedule =
            generate_schedule(date(2020, 1, 31), date(2021, 1, 29), date(2020, 2, 29), 1).unwrap();
        assert!(schedule.dates().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(schedule.dates()[2], date(2020, 3, 29));
    }

    #[test]
    fn test_first_payment_not_after_start() {
        let err =
            generate_schedule(date(2021, 4, 7), date(2025, 4, 7), date(2021, 4, 7), 6).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchedule { .. }));
    }

    #[test]
    fn test_zero_frequency() {
        let err = generate_schedule(date(2021, 4, 7), date(2025, 4, 7), date(2021, 10, 7), 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchedule { .. }));
    }

    #[test]
    fn test_position_and_period_days() {
        let schedule =
            generate_schedule(date(2021, 4, 7), date(2022, 4, 7), date(2021, 10, 7), 6).unwrap();

        assert_eq!(schedule.position(date(2022, 4, 7)), Some(2));
        assert!(!schedule.contains(date(2022, 1, 7)));
        assert_eq!(schedule.period_days(0), 183);
        assert_eq!(schedule.period_days(1), 182);
    }
}
