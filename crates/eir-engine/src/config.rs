//! Engine configuration.

use eir_math::optimization::LeastSquaresConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Settings that control how effective interest rates are solved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Least squares solver settings.
    pub solver: LeastSquaresConfig,

    /// Largest absolute terminal amortized cost accepted after solving.
    /// `None` accepts whatever the solver returns.
    pub residual_threshold: Option<f64>,

    /// Bounds for the effective interest rate.
    pub rate_bounds: (f64, f64),

    /// Evaluate batches in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Minimum batch size before parallel evaluation is used.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            solver: LeastSquaresConfig::default(),
            residual_threshold: Some(1.0),
            rate_bounds: (0.0, 1.0),
            parallel: true,
            parallel_threshold: 8,
        }
    }
}

impl EngineConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that never rejects a solver result for its residual.
    #[must_use]
    pub fn best_effort() -> Self {
        Self {
            residual_threshold: None,
            ..Self::default()
        }
    }

    /// Sets the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: LeastSquaresConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the residual threshold.
    #[must_use]
    pub fn with_residual_threshold(mut self, threshold: Option<f64>) -> Self {
        self.residual_threshold = threshold;
        self
    }

    /// Sets the rate bounds.
    #[must_use]
    pub fn with_rate_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.rate_bounds = (lower, upper);
        self
    }

    /// Sets whether batches may run in parallel.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if a batch of `count` deals should be evaluated in parallel.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        self.parallel && count >= self.parallel_threshold
    }

    /// Checks the configuration for values the solver cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        self.solver.validate()?;

        let (lower, upper) = self.rate_bounds;
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(EngineError::input_validation(
                "rate_bounds",
                format!("[{lower}, {upper}] is not a finite, non-empty interval"),
            ));
        }

        if let Some(threshold) = self.residual_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(EngineError::input_validation(
                    "residual_threshold",
                    format!("must be a non-negative number, got {threshold}"),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.residual_threshold, Some(1.0));
        assert_eq!(config.rate_bounds, (0.0, 1.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_best_effort() {
        let config = EngineConfig::best_effort();
        assert_eq!(config.residual_threshold, None);
        assert_eq!(config.solver, LeastSquaresConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_residual_threshold(Some(0.01))
            .with_rate_bounds(0.0, 0.5)
            .with_parallel(false);

        assert_eq!(config.residual_threshold, Some(0.01));
        assert_eq!(config.rate_bounds, (0.0, 0.5));
        assert!(!config.should_parallelize(1_000));
    }

    #[test]
    fn test_should_parallelize() {
        let config = EngineConfig::default().with_parallel_threshold(10);
        assert!(!config.should_parallelize(9));
        assert!(config.should_parallelize(10));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(EngineConfig::default()
            .with_rate_bounds(1.0, 0.0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_residual_threshold(Some(-1.0))
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_solver(LeastSquaresConfig::default().with_max_iterations(0))
            .validate()
            .is_err());
    }
}
