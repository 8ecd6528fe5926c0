//! Effective interest rate solver.
//!
//! The effective interest rate `r` is the constant rate at which the
//! amortized cost recursion
//!
//! ```text
//! AC[0]     = -CF[0]
//! AC[i + 1] = AC[i] - CF[i + 1] + AC[i] * r * days(i, i + 1) / 365
//! ```
//!
//! ends at zero after the last payment. Effective interest always accrues on
//! an actual/365 basis, independent of the day count used for nominal
//! interest.
//!
//! [`solve_rate`] finds `r` with bounded least squares. [`amortize`] then
//! replays the recursion at that rate, rounding each figure to cents, to
//! produce the disclosed series.

use eir_core::rounding::round_currency;
use eir_core::Date;
use eir_math::optimization::least_squares;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Day basis for effective interest.
pub const EFFECTIVE_DAY_BASIS: f64 = 365.0;

// =============================================================================
// Objective
// =============================================================================

/// Returns the amortized cost left after the last cash flow at `rate`.
///
/// `dates` and `cash_flows` are aligned: `cash_flows[i]` falls on
/// `dates[i]`. This is the residual the solver drives to zero.
#[must_use]
pub fn terminal_amortized_cost(rate: f64, dates: &[Date], cash_flows: &[f64]) -> f64 {
    let Some((&initial, received)) = cash_flows.split_first() else {
        return 0.0;
    };

    let mut amortized_cost = -initial;
    for (period, &cash_flow) in dates.windows(2).zip(received) {
        let days = period[0].days_between(&period[1]) as f64;
        let effective_interest = amortized_cost * rate * (days / EFFECTIVE_DAY_BASIS);
        amortized_cost = amortized_cost - cash_flow + effective_interest;
    }
    amortized_cost
}

/// Returns the derivative of [`terminal_amortized_cost`] with respect to `rate`.
#[must_use]
pub fn terminal_amortized_cost_derivative(rate: f64, dates: &[Date], cash_flows: &[f64]) -> f64 {
    let Some((&initial, received)) = cash_flows.split_first() else {
        return 0.0;
    };

    let mut amortized_cost = -initial;
    let mut derivative = 0.0;
    for (period, &cash_flow) in dates.windows(2).zip(received) {
        let tau = period[0].days_between(&period[1]) as f64 / EFFECTIVE_DAY_BASIS;
        derivative = derivative * (1.0 + rate * tau) + amortized_cost * tau;
        amortized_cost = amortized_cost - cash_flow + amortized_cost * rate * tau;
    }
    derivative
}

// =============================================================================
// Solving
// =============================================================================

/// A solved effective interest rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateSolution {
    /// Effective interest rate per annum, as a decimal.
    pub rate: f64,
    /// Amortized cost left after the last cash flow at `rate`.
    pub terminal_amortized_cost: f64,
    /// Solver iterations used.
    pub iterations: u32,
    /// Whether the solver met a convergence criterion.
    pub converged: bool,
}

/// Solves for the effective interest rate of a cash flow series.
///
/// `guess` is clipped into the configured rate bounds before solving.
///
/// # Errors
///
/// - `InputValidation` if `dates` and `cash_flows` are not aligned or hold
///   fewer than two entries
/// - `Math` if the solver rejects its inputs or the residual is not finite
/// - `NumericalInstability` if the rate is not finite, falls outside the
///   bounds, or leaves a terminal amortized cost above
///   `config.residual_threshold`
pub fn solve_rate(
    guess: f64,
    dates: &[Date],
    cash_flows: &[f64],
    config: &EngineConfig,
) -> EngineResult<RateSolution> {
    if dates.len() != cash_flows.len() {
        return Err(EngineError::input_validation(
            "cash_flows",
            format!(
                "{} cash flows do not line up with {} dates",
                cash_flows.len(),
                dates.len()
            ),
        ));
    }
    if cash_flows.len() < 2 {
        return Err(EngineError::input_validation(
            "cash_flows",
            "at least one payment after inception is required",
        ));
    }

    let result = least_squares(
        |rate| terminal_amortized_cost(rate, dates, cash_flows),
        |rate| terminal_amortized_cost_derivative(rate, dates, cash_flows),
        guess,
        config.rate_bounds,
        &config.solver,
    )?;

    let (lower, upper) = config.rate_bounds;
    if !result.x.is_finite() || result.x < lower || result.x > upper {
        return Err(EngineError::numerical_instability(format!(
            "effective interest rate {} is outside [{lower}, {upper}]",
            result.x
        )));
    }

    if !result.converged {
        tracing::warn!(
            rate = result.x,
            residual = result.residual,
            iterations = result.iterations,
            termination = ?result.termination,
            "effective interest solve stopped without converging"
        );
    }

    if let Some(threshold) = config.residual_threshold {
        if result.residual.abs() > threshold {
            return Err(EngineError::numerical_instability(format!(
                "terminal amortized cost {:.6} exceeds the threshold of {threshold} at rate {}",
                result.residual, result.x
            )));
        }
    }

    tracing::debug!(
        rate = result.x,
        residual = result.residual,
        iterations = result.iterations,
        "effective interest rate solved"
    );

    Ok(RateSolution {
        rate: result.x,
        terminal_amortized_cost: result.residual,
        iterations: result.iterations,
        converged: result.converged,
    })
}

// =============================================================================
// Amortization
// =============================================================================

/// The disclosed amortized cost series for one cash flow series.
///
/// Per-period vectors (`effective_interest`, `amortization`, `eir`) hold one
/// entry per payment; balance vectors (`amortized_cost`,
/// `capitalized_costs`) hold one more, entry 0 being inception.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSeries {
    /// Effective interest per period, rounded to cents.
    pub effective_interest: Vec<f64>,
    /// Amortized cost at each date, rounded to cents after inception.
    pub amortized_cost: Vec<f64>,
    /// Effective minus nominal interest per period, rounded to cents.
    pub amortization: Vec<f64>,
    /// Annualized effective interest rate per period in percent, 2 dp.
    pub eir: Vec<f64>,
    /// Unamortized capitalized finance cost at each date.
    pub capitalized_costs: Vec<f64>,
}

/// Replays the amortized cost recursion at `rate`.
///
/// Each period's effective interest, closing amortized cost and amortization
/// are rounded to cents as they are produced, and the rounded values feed
/// the next period. The capitalized finance cost is drawn down by each
/// period's amortization.
#[must_use]
pub fn amortize(
    rate: f64,
    dates: &[Date],
    cash_flows: &[f64],
    nominal_interest: &[f64],
    capitalized_cost: f64,
) -> AmortizationSeries {
    let periods = dates
        .len()
        .saturating_sub(1)
        .min(cash_flows.len().saturating_sub(1))
        .min(nominal_interest.len());

    let mut series = AmortizationSeries {
        effective_interest: Vec::with_capacity(periods),
        amortized_cost: Vec::with_capacity(periods + 1),
        amortization: Vec::with_capacity(periods),
        eir: Vec::with_capacity(periods),
        capitalized_costs: Vec::with_capacity(periods + 1),
    };

    let mut amortized_cost = cash_flows.first().map_or(0.0, |&cf| -cf);
    let mut capitalized = capitalized_cost;
    series.amortized_cost.push(amortized_cost);
    series.capitalized_costs.push(capitalized);

    for i in 0..periods {
        let days = dates[i].days_between(&dates[i + 1]) as f64;
        let nominal = nominal_interest[i];

        let effective = round_currency(amortized_cost * rate * days / EFFECTIVE_DAY_BASIS);
        let amortization = round_currency(effective - nominal);
        let eir = disclosed_eir(nominal + amortization, amortized_cost, days);

        series.effective_interest.push(effective);
        series.amortization.push(amortization);
        series.eir.push(eir);

        amortized_cost = round_currency(amortized_cost - cash_flows[i + 1] + effective);
        capitalized -= amortization;
        series.amortized_cost.push(amortized_cost);
        series.capitalized_costs.push(capitalized);
    }

    series
}

/// Annualizes a period's effective interest into a percentage, 2 dp.
#[must_use]
pub fn disclosed_eir(effective_interest: f64, amortized_cost: f64, days: f64) -> f64 {
    eir_core::rounding::round_dp(
        (effective_interest / amortized_cost / days * EFFECTIVE_DAY_BASIS) * 100.0,
        2,
    )
}

/// The solved rate together with the series it produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveInterest {
    /// The solved rate.
    pub solution: RateSolution,
    /// The disclosed series at that rate.
    pub series: AmortizationSeries,
}

/// Solves for the effective interest rate and amortizes at it.
///
/// # Errors
///
/// Returns any error from [`solve_rate`].
pub fn calculate_effective_interest(
    guess: f64,
    dates: &[Date],
    cash_flows: &[f64],
    nominal_interest: &[f64],
    capitalized_cost: f64,
    config: &EngineConfig,
) -> EngineResult<EffectiveInterest> {
    let solution = solve_rate(guess, dates, cash_flows, config)?;
    let series = amortize(solution.rate, dates, cash_flows, nominal_interest, capitalized_cost);
    Ok(EffectiveInterest { solution, series })
}
