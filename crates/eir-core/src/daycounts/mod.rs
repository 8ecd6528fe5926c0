//! Day count conventions for nominal interest accrual.
//!
//! Day count conventions determine how an annual rate is turned into a
//! period's rate by specifying how to count days between two dates and
//! the year basis.
//!
//! # Supported Conventions
//!
//! - [`Thirty360`]: 30/360 - fixed fraction per period, dates ignored
//! - [`Act360`]: Actual/360
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`ActAct`]: Actual/Actual with the leap-year test anchored to one year
//!
//! # Usage
//!
//! ```rust
//! use eir_core::daycounts::{DayCount, ActAct};
//! use eir_core::types::{Date, Frequency};
//!
//! let dc = ActAct;
//! let start = Date::from_ymd(2023, 10, 7).unwrap();
//! let end = Date::from_ymd(2024, 4, 7).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 183);
//! let rate = dc.periodic_rate(0.05, start, end, Frequency::SemiAnnual);
//! assert!((rate - 0.05 / 366.0 * 183.0).abs() < 1e-15);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActAct;
pub use thirty360::Thirty360;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Frequency};

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`) so that deals can be
/// evaluated in parallel.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g., "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction of an accrual period.
    ///
    /// `frequency` is the deal's payment frequency; conventions that do
    /// not look at actual dates derive the fraction from it.
    fn year_fraction(&self, start: Date, end: Date, frequency: Frequency) -> f64;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Converts an annual rate into the rate for one accrual period.
    fn periodic_rate(&self, annual_rate: f64, start: Date, end: Date, frequency: Frequency) -> f64 {
        annual_rate * self.year_fraction(start, end, frequency)
    }
}

/// Enumeration of the supported day count conventions.
///
/// Serializes with the identifiers used in deal files
/// (`thirty_360`, `actual_360`, `actual_365`, `actual_actual`).
///
/// # Example
///
/// ```rust
/// use eir_core::daycounts::DayCountConvention;
///
/// let convention: DayCountConvention = "actual_actual".parse().unwrap();
/// assert_eq!(convention, DayCountConvention::ActualActual);
/// assert_eq!(convention.to_day_count().name(), "ACT/ACT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 30/360
    #[serde(rename = "thirty_360")]
    Thirty360,

    /// Actual/360
    #[serde(rename = "actual_360")]
    Actual360,

    /// Actual/365 Fixed
    #[serde(rename = "actual_365")]
    Actual365,

    /// Actual/Actual (anchored)
    #[serde(rename = "actual_actual")]
    ActualActual,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Thirty360 => Box::new(Thirty360),
            DayCountConvention::Actual360 => Box::new(Act360),
            DayCountConvention::Actual365 => Box::new(Act365Fixed),
            DayCountConvention::ActualActual => Box::new(ActAct),
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Actual365 => "ACT/365F",
            DayCountConvention::ActualActual => "ACT/ACT",
        }
    }

    /// Returns the identifier used in deal files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "thirty_360",
            DayCountConvention::Actual360 => "actual_360",
            DayCountConvention::Actual365 => "actual_365",
            DayCountConvention::ActualActual => "actual_actual",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Thirty360,
            DayCountConvention::Actual360,
            DayCountConvention::Actual365,
            DayCountConvention::ActualActual,
        ]
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention from a string.
    ///
    /// Accepts deal-file identifiers ("actual_365") and market names
    /// ("ACT/365", "30/360"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "THIRTY_360" | "30/360" | "30_360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            "ACTUAL_360" | "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Actual360),
            "ACTUAL_365" | "ACT/365" | "ACT/365F" | "ACTUAL/365" | "ACT365" => {
                Ok(DayCountConvention::Actual365)
            }
            "ACTUAL_ACTUAL" | "ACT/ACT" | "ACTUAL/ACTUAL" | "ACTACT" => {
                Ok(DayCountConvention::ActualActual)
            }
            _ => Err(CoreError::InvalidDayCount {
                value: s.to_string(),
            }),
        }
    }
}
