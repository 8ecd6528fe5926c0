//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Lower bound is not below the upper bound, or a bound is NaN.
    #[error("Invalid bounds: [{lower}, {upper}]")]
    InvalidBounds {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// The residual function returned NaN or infinity.
    #[error("Residual is not finite at x = {x}")]
    NonFiniteResidual {
        /// The point at which the residual was evaluated.
        x: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid bounds error.
    #[must_use]
    pub fn invalid_bounds(lower: f64, upper: f64) -> Self {
        Self::InvalidBounds { lower, upper }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::invalid_bounds(1.0, 0.0);
        assert_eq!(err.to_string(), "Invalid bounds: [1, 0]");

        let err = MathError::NonFiniteResidual { x: 0.5 };
        assert!(err.to_string().contains("x = 0.5"));
    }
}
