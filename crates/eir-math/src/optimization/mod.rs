//! Bounded nonlinear least squares.
//!
//! Finds the parameter `x` within `[lower, upper]` that minimizes
//! `0.5 * r(x)^2` for a scalar residual function `r`. When the residual has
//! a root inside the bounds this is a root finder that never leaves the
//! feasible interval, which bracketing methods cannot promise without a
//! sign change and Newton-Raphson cannot promise at all.
//!
//! The method is a projected Levenberg-Marquardt iteration: each trial step
//! is the Gauss-Newton step shrunk by a damping factor, clipped to the
//! bounds, and accepted only if it reduces the cost. Damping falls after a
//! successful step and rises after a rejected one.
//!
//! - [`least_squares`]: with an analytical derivative of the residual
//! - [`least_squares_numerical`]: derivative by central differences
//!
//! # Example
//!
//! ```rust
//! use eir_math::optimization::{least_squares, LeastSquaresConfig};
//!
//! // Rate at which 105 paid in one year is worth 100 today
//! let f = |r: f64| 100.0 * (1.0 + r) - 105.0;
//! let df = |_r: f64| 100.0;
//!
//! let result = least_squares(f, df, 0.01, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();
//! assert!(result.converged);
//! assert!((result.x - 0.05).abs() < 1e-12);
//! ```

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Smallest damping factor reached after repeated successful steps.
const MIN_DAMPING: f64 = 1e-12;

/// Damping factor beyond which no further trial steps are attempted.
const MAX_DAMPING: f64 = 1e12;

/// Configuration for the least squares solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeastSquaresConfig {
    /// Relative cost reduction below which an accepted step ends the search.
    pub ftol: f64,
    /// Relative step size below which the search ends.
    pub xtol: f64,
    /// Projected gradient magnitude below which the search ends.
    pub gtol: f64,
    /// Maximum number of outer iterations.
    pub max_iterations: u32,
    /// Damping factor for the first trial step.
    pub initial_damping: f64,
    /// Relative step for numerical derivatives.
    pub step_size: f64,
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            ftol: 1e-10,
            xtol: 1e-12,
            gtol: 1e-10,
            max_iterations: 100,
            initial_damping: 1e-3,
            step_size: 1e-8,
        }
    }
}

impl LeastSquaresConfig {
    /// Sets the cost reduction tolerance.
    #[must_use]
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Sets the step size tolerance.
    #[must_use]
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    /// Sets the gradient tolerance.
    #[must_use]
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the initial damping factor.
    #[must_use]
    pub fn with_initial_damping(mut self, initial_damping: f64) -> Self {
        self.initial_damping = initial_damping;
        self
    }

    /// Checks that every tolerance is finite and non-negative.
    pub fn validate(&self) -> MathResult<()> {
        let tolerances = [
            ("ftol", self.ftol),
            ("xtol", self.xtol),
            ("gtol", self.gtol),
            ("initial_damping", self.initial_damping),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(MathError::invalid_input(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "step_size must be positive, got {}",
                self.step_size
            )));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_input("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Reason the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The residual is exactly zero.
    ExactRoot,
    /// The projected gradient vanished.
    Gtol,
    /// An accepted step barely reduced the cost.
    Ftol,
    /// The next step would barely move `x`.
    Xtol,
    /// The iteration limit was reached.
    MaxIterations,
    /// No trial step reduced the cost, even with maximum damping.
    Stalled,
}

impl Termination {
    /// Returns true if the stop reason is a convergence criterion.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        !matches!(self, Termination::MaxIterations | Termination::Stalled)
    }
}

/// Result of a least squares run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresResult {
    /// The best parameter found.
    pub x: f64,
    /// Residual at `x`.
    pub residual: f64,
    /// Cost `0.5 * residual^2` at `x`.
    pub cost: f64,
    /// Number of outer iterations.
    pub iterations: u32,
    /// Number of residual evaluations.
    pub evaluations: u32,
    /// Why the solver stopped.
    pub termination: Termination,
    /// Whether a convergence criterion was met.
    pub converged: bool,
}

/// Outcome of one damped step search.
enum Trial {
    Accepted { x: f64, residual: f64, cost: f64 },
    Negligible,
    Rejected,
}

/// Minimizes `0.5 * f(x)^2` over `[bounds.0, bounds.1]` using the derivative `df`.
///
/// The starting point is clipped into the bounds. A residual that is zero
/// at the start returns immediately.
///
/// # Arguments
///
/// * `f` - Residual function
/// * `df` - Derivative of the residual
/// * `x0` - Starting point
/// * `bounds` - Inclusive lower and upper bound for `x`
/// * `config` - Solver configuration
///
/// # Errors
///
/// Returns an error if the configuration or bounds are invalid, `x0` is not
/// finite, or the residual or its derivative becomes non-finite at a point
/// the solver evaluates.
pub fn least_squares<F, DF>(
    f: F,
    df: DF,
    x0: f64,
    bounds: (f64, f64),
    config: &LeastSquaresConfig,
) -> MathResult<LeastSquaresResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    config.validate()?;

    let (lower, upper) = bounds;
    if lower.is_nan() || upper.is_nan() || lower >= upper {
        return Err(MathError::invalid_bounds(lower, upper));
    }
    if !x0.is_finite() {
        return Err(MathError::invalid_input(format!(
            "starting point must be finite, got {x0}"
        )));
    }

    let evaluations = Cell::new(0u32);
    let residual_at = |x: f64| -> MathResult<f64> {
        evaluations.set(evaluations.get() + 1);
        let r = f(x);
        if r.is_finite() {
            Ok(r)
        } else {
            Err(MathError::NonFiniteResidual { x })
        }
    };

    let mut x = x0.clamp(lower, upper);
    let mut r = residual_at(x)?;
    let mut cost = 0.5 * r * r;
    let mut damping = config.initial_damping;
    let mut iterations = 0u32;

    let termination = loop {
        if r == 0.0 {
            break Termination::ExactRoot;
        }
        if iterations >= config.max_iterations {
            break Termination::MaxIterations;
        }
        iterations += 1;

        let jacobian = df(x);
        if !jacobian.is_finite() {
            return Err(MathError::invalid_input(format!(
                "derivative is not finite at x = {x}"
            )));
        }

        let gradient = jacobian * r;
        let blocked = (x <= lower && gradient > 0.0) || (x >= upper && gradient < 0.0);
        let projected = if blocked { 0.0 } else { gradient };
        if projected.abs() <= config.gtol {
            break Termination::Gtol;
        }

        let hessian = jacobian * jacobian;
        let trial = loop {
            let candidate = (x - gradient / (hessian * (1.0 + damping))).clamp(lower, upper);
            if (candidate - x).abs() <= config.xtol * (config.xtol + x.abs()) {
                break Trial::Negligible;
            }

            let candidate_residual = residual_at(candidate)?;
            let candidate_cost = 0.5 * candidate_residual * candidate_residual;
            if candidate_cost < cost {
                damping = (damping / 10.0).max(MIN_DAMPING);
                break Trial::Accepted {
                    x: candidate,
                    residual: candidate_residual,
                    cost: candidate_cost,
                };
            }

            damping = damping.max(MIN_DAMPING) * 10.0;
            if damping > MAX_DAMPING {
                break Trial::Rejected;
            }
        };

        match trial {
            Trial::Accepted {
                x: next_x,
                residual,
                cost: next_cost,
            } => {
                let reduction = cost - next_cost;
                let previous_cost = cost;
                x = next_x;
                r = residual;
                cost = next_cost;
                tracing::trace!(iteration = iterations, x, residual = r, damping, "step accepted");

                if reduction <= config.ftol * previous_cost {
                    break Termination::Ftol;
                }
            }
            Trial::Negligible => break Termination::Xtol,
            Trial::Rejected => break Termination::Stalled,
        }
    };

    let converged = termination.is_converged();
    tracing::debug!(
        x,
        residual = r,
        iterations,
        evaluations = evaluations.get(),
        ?termination,
        "least squares finished"
    );

    Ok(LeastSquaresResult {
        x,
        residual: r,
        cost,
        iterations,
        evaluations: evaluations.get(),
        termination,
        converged,
    })
}

/// Minimizes `0.5 * f(x)^2` over the bounds with a numerical derivative.
///
/// The derivative is a central difference with step
/// `config.step_size * max(1, |x|)`, taken one-sided at a bound.
pub fn least_squares_numerical<F>(
    f: F,
    x0: f64,
    bounds: (f64, f64),
    config: &LeastSquaresConfig,
) -> MathResult<LeastSquaresResult>
where
    F: Fn(f64) -> f64,
{
    let (lower, upper) = bounds;
    let step_size = config.step_size;
    let df = |x: f64| {
        let h = step_size * x.abs().max(1.0);
        let hi = (x + h).min(upper);
        let lo = (x - h).max(lower);
        (f(hi) - f(lo)) / (hi - lo)
    };
    least_squares(&f, df, x0, bounds, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_linear_residual() {
        let f = |x: f64| 2.0 * x - 1.0;
        let df = |_x: f64| 2.0;

        let result = least_squares(f, df, 0.9, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.x, 0.5, epsilon = 1e-11);
        assert!(result.residual.abs() < 1e-10);
    }

    #[test]
    fn test_cubic_root() {
        let f = |x: f64| x * x * x - x - 2.0;
        let df = |x: f64| 3.0 * x * x - 1.0;

        let result = least_squares(f, df, 1.0, (1.0, 2.0), &LeastSquaresConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.x, 1.521_379_706_804_567_6, epsilon = 1e-10);
    }

    #[test]
    fn test_numerical_derivative() {
        let f = |x: f64| x.exp() - 2.0;

        let result =
            least_squares_numerical(f, 0.1, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.x, std::f64::consts::LN_2, epsilon = 1e-9);
    }

    #[test]
    fn test_start_outside_bounds_is_clipped() {
        let f = |x: f64| 2.0 * x - 1.0;
        let df = |_x: f64| 2.0;

        let result = least_squares(f, df, 5.0, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.x, 0.5, epsilon = 1e-11);
    }

    #[test]
    fn test_root_outside_bounds_stops_at_bound() {
        // Root at -1; best feasible point is the lower bound.
        let f = |x: f64| x + 1.0;
        let df = |_x: f64| 1.0;

        let result = least_squares(f, df, 0.5, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert_eq!(result.x, 0.0);
        assert_relative_eq!(result.residual, 1.0);
        assert_eq!(result.termination, Termination::Gtol);
    }

    #[test]
    fn test_exact_root_at_start() {
        let f = |x: f64| x - 0.25;
        let df = |_x: f64| 1.0;

        let result =
            least_squares(f, df, 0.25, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert_eq!(result.termination, Termination::ExactRoot);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_max_iterations() {
        let f = |x: f64| x * x * x - x - 2.0;
        let df = |x: f64| 3.0 * x * x - 1.0;
        let config = LeastSquaresConfig::default().with_max_iterations(1);

        let result = least_squares(f, df, 3.0, (0.0, 3.0), &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.termination, Termination::MaxIterations);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_invalid_bounds() {
        let f = |x: f64| x;
        let df = |_x: f64| 1.0;
        let config = LeastSquaresConfig::default();

        assert_eq!(
            least_squares(f, df, 0.5, (1.0, 0.0), &config).unwrap_err(),
            MathError::invalid_bounds(1.0, 0.0)
        );
        assert!(least_squares(f, df, 0.5, (f64::NAN, 1.0), &config).is_err());
    }

    #[test]
    fn test_non_finite_start() {
        let f = |x: f64| x;
        let df = |_x: f64| 1.0;

        let result = least_squares(f, df, f64::NAN, (0.0, 1.0), &LeastSquaresConfig::default());
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_non_finite_residual() {
        let f = |x: f64| 1.0 / x;
        let df = |x: f64| -1.0 / (x * x);

        let result = least_squares(f, df, 0.0, (0.0, 1.0), &LeastSquaresConfig::default());
        assert_eq!(result.unwrap_err(), MathError::NonFiniteResidual { x: 0.0 });
    }

    #[test]
    fn test_invalid_config() {
        let f = |x: f64| x;
        let df = |_x: f64| 1.0;
        let config = LeastSquaresConfig::default().with_ftol(-1.0);

        assert!(least_squares(f, df, 0.5, (0.0, 1.0), &config).is_err());
        assert!(LeastSquaresConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: LeastSquaresConfig = serde_json::from_str(r#"{"max_iterations": 25}"#).unwrap();
        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.xtol, LeastSquaresConfig::default().xtol);
    }

    #[test]
    fn test_annuity_rate() {
        // Five payments of 30 against an investment of 100
        let f = |r: f64| (1..=5).map(|t| 30.0 / (1.0 + r).powi(t)).sum::<f64>() - 100.0;
        let df = |r: f64| {
            (1..=5)
                .map(|t| -f64::from(t) * 30.0 / (1.0 + r).powi(t + 1))
                .sum::<f64>()
        };

        let result =
            least_squares(f, df, 0.05, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

        assert!(result.converged);
        assert!(f(result.x).abs() < 1e-9);
        assert!(result.x > 0.15 && result.x < 0.16);
    }

    proptest! {
        #[test]
        fn prop_finds_interior_root(a in 0.01f64..0.9, x0 in 0.0f64..1.0) {
            let f = |x: f64| (x - a) * (1.0 + x);
            let df = |x: f64| 2.0 * x + 1.0 - a;

            let result =
                least_squares(f, df, x0, (0.0, 1.0), &LeastSquaresConfig::default()).unwrap();

            prop_assert!(result.converged);
            prop_assert!((result.x - a).abs() < 1e-9);
        }
    }
}
