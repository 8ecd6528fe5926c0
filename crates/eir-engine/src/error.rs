//! Error types for the effective interest engine.
//!
//! Each variant corresponds to one class of failure a caller can act on:
//! bad input values, an inconsistent payment schedule, conflicting
//! business rules, or a numerical result that cannot be trusted.

use eir_core::{CoreError, Date};
use eir_math::MathError;
use thiserror::Error;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while validating a deal or computing its schedule.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A deal term is malformed or out of range.
    #[error("invalid {field}: {reason}")]
    InputValidation {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The payment schedule cannot be generated from the given dates.
    #[error("invalid schedule: {reason}")]
    InvalidSchedule {
        /// Why the schedule is invalid.
        reason: String,
    },

    /// A rate reset does not line up with the payment schedule.
    #[error("date is not valid: {date} ({reason})")]
    ScheduleConsistency {
        /// The reset date.
        date: Date,
        /// Why the date was rejected.
        reason: String,
    },

    /// Discount and premium were both given.
    #[error("instrument cannot carry both discount ({discount}%) and premium ({premium}%)")]
    DualExclusivity {
        /// Discount in percent of principal.
        discount: f64,
        /// Premium in percent of principal.
        premium: f64,
    },

    /// The solver produced a rate or schedule that cannot be trusted.
    #[error("numerical instability: {reason}")]
    NumericalInstability {
        /// Description of the failure.
        reason: String,
    },

    /// Error from a core domain type.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the least squares solver.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl EngineError {
    /// Creates an input validation error.
    #[must_use]
    pub fn input_validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid schedule error.
    #[must_use]
    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// Creates a schedule consistency error.
    #[must_use]
    pub fn schedule_consistency(date: Date, reason: impl Into<String>) -> Self {
        Self::ScheduleConsistency {
            date,
            reason: reason.into(),
        }
    }

    /// Creates a numerical instability error.
    #[must_use]
    pub fn numerical_instability(reason: impl Into<String>) -> Self {
        Self::NumericalInstability {
            reason: reason.into(),
        }
    }
}
