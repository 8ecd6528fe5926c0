//! Domain types for amortization schedules.
//!
//! - [`Date`]: Calendar date for schedules and accrual
//! - [`Currency`]: ISO currency codes
//! - [`Frequency`]: Payment frequency

mod currency;
mod date;
mod frequency;

pub use currency::Currency;
pub use date::Date;
pub use frequency::Frequency;
