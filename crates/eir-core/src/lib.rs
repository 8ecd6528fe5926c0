//! # EIR Core
//!
//! Domain primitives for the Amortis effective interest rate engine.
//!
//! This crate provides the building blocks the engine computes with:
//!
//! - **Types**: `Date`, `Frequency`, `Currency`
//! - **Day Count Conventions**: the four accrual conventions a deal can carry
//! - **Rounding**: currency-precision rounding of `f64` amounts
//!
//! ## Example
//!
//! ```rust
//! use eir_core::prelude::*;
//!
//! let start = Date::from_ymd(2021, 4, 7).unwrap();
//! let end = Date::from_ymd(2021, 10, 7).unwrap();
//!
//! let dc = DayCountConvention::Actual365.to_day_count();
//! let fraction = dc.year_fraction(start, end, Frequency::SemiAnnual);
//! assert!((fraction - 183.0 / 365.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod daycounts;
pub mod error;
pub mod rounding;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::rounding::round_dp;
    pub use crate::types::{Currency, Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, Frequency};
