//! Effective interest schedules under rate resets.
//!
//! Two methods produce a full schedule for a deal:
//!
//! - [`Method::Complex`] re-solves the effective interest rate from each
//!   reset date onwards, starting from the capitalized finance cost carried
//!   to that date, and keeps only the periods up to the next reset. Periods
//!   before a reset are never revised.
//! - [`Method::Simple`] solves once at inception at the first rate and, when
//!   later resets exist, takes each period's effective interest as the new
//!   nominal interest plus the inception amortization. No further solving
//!   is done, so the result is an approximation.
//!
//! For a deal with a single rate both methods run the same solve and return
//! identical schedules.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use eir_core::Date;
use serde::{Deserialize, Serialize};

use crate::accrual::{accrue, period_rates, reset_coupon_indices};
use crate::balances::principal_balances;
use crate::cashflows::assemble;
use crate::config::EngineConfig;
use crate::deal::Deal;
use crate::error::{EngineError, EngineResult};
use crate::solver::{calculate_effective_interest, disclosed_eir, RateSolution};

// =============================================================================
// Method and results
// =============================================================================

/// Re-estimation method for floating rate deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Re-solve from every reset date.
    #[default]
    Complex,
    /// Solve once and shift effective interest by the nominal change.
    Simple,
}

impl Method {
    /// Returns both methods.
    #[must_use]
    pub fn all() -> &'static [Method] {
        &[Method::Complex, Method::Simple]
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Complex => write!(f, "complex"),
            Method::Simple => write!(f, "simple"),
        }
    }
}

impl FromStr for Method {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complex" => Ok(Method::Complex),
            "simple" => Ok(Method::Simple),
            _ => Err(EngineError::input_validation(
                "method",
                format!("'{s}' is not complex or simple"),
            )),
        }
    }
}

/// Wall time spent solving, in seconds.
///
/// A simple method run reports its inception solve as `complex_seconds` and
/// the shortcut as `simple_seconds`; with a single rate there is no
/// shortcut and both hold the solve time. A complex method run reports the
/// total time of its solves in both fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodTimings {
    /// Time of the full effective interest solving.
    pub complex_seconds: f64,
    /// Time of the shortcut, or of the solve when there is none.
    pub simple_seconds: f64,
}

impl MethodTimings {
    fn same(elapsed: Duration) -> Self {
        Self {
            complex_seconds: elapsed.as_secs_f64(),
            simple_seconds: elapsed.as_secs_f64(),
        }
    }

    /// Returns `complex_seconds / simple_seconds - 1`, or `None` if the
    /// simple time is zero.
    #[must_use]
    pub fn efficiency(&self) -> Option<f64> {
        (self.simple_seconds > 0.0).then(|| self.complex_seconds / self.simple_seconds - 1.0)
    }
}

/// A deal's complete effective interest schedule, column by column.
///
/// Balance columns (`principal_balances`, `cash_flows`,
/// `capitalized_costs`, `amortized_cost`) have one entry per date. Period
/// columns (`rates`, `nominal_interest`, `effective_interest`,
/// `amortization`, `eir`) have one entry per payment, entry `i` covering
/// the period ending on `dates[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EirSchedule {
    /// Method that produced the schedule.
    pub method: Method,
    /// Payment dates, start date first.
    pub dates: Vec<Date>,
    /// Principal outstanding at each date.
    pub principal_balances: Vec<f64>,
    /// Nominal rate of each period, as a decimal.
    pub rates: Vec<f64>,
    /// Nominal interest of each period.
    pub nominal_interest: Vec<f64>,
    /// Total cash flow at each date.
    pub cash_flows: Vec<f64>,
    /// Unamortized capitalized finance cost at each date.
    pub capitalized_costs: Vec<f64>,
    /// Amortized cost at each date.
    pub amortized_cost: Vec<f64>,
    /// Effective interest of each period.
    pub effective_interest: Vec<f64>,
    /// Effective minus nominal interest of each period.
    pub amortization: Vec<f64>,
    /// Annualized effective interest rate of each period, in percent.
    pub eir: Vec<f64>,
    /// Solved rates, one per solve.
    pub solutions: Vec<RateSolution>,
    /// Solve timings.
    pub timings: MethodTimings,
}

impl EirSchedule {
    /// Returns the number of payments.
    #[must_use]
    pub fn number_of_payments(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }
}

// =============================================================================
// Methods
// =============================================================================

/// Builds the schedule of `deal` with the given method.
///
/// # Errors
///
/// Returns any error from the effective interest solves.
pub fn reestimate(deal: &Deal, method: Method, config: &EngineConfig) -> EngineResult<EirSchedule> {
    match method {
        Method::Complex => complex_method(deal, config),
        Method::Simple => simple_method(deal, config),
    }
}

/// Builds the schedule by re-solving from every reset date.
///
/// Reset `k` takes effect from coupon `c_k`. Its solve covers coupons
/// `c_k..n`, accruing at the reset rate on the outstanding principal and
/// starting from the capitalized finance cost left at `c_k`; coupons
/// `c_k..c_{k+1}` of that solve are kept. The last reset's solve is kept in
/// full, including the closing amortized cost.
///
/// # Errors
///
/// - `InvalidSchedule` if the first reset does not start at the first
///   coupon
/// - any error from the effective interest solves
pub fn complex_method(deal: &Deal, config: &EngineConfig) -> EngineResult<EirSchedule> {
    let dates = deal.schedule().dates();
    let n = deal.number_of_payments();
    let balances = principal_balances(deal.structure(), deal.principal(), n);
    let starts = reset_coupon_indices(deal.resets(), dates);
    if starts.first() != Some(&0) || starts.len() != deal.resets().len() {
        return Err(EngineError::invalid_schedule(
            "rate resets must start on the first interest date and fall on payment dates",
        ));
    }

    let mut nominal_interest = vec![0.0; n];
    let mut cash_flows = vec![0.0; n + 1];
    let mut capitalized_costs = vec![0.0; n + 1];
    let mut amortized_cost = vec![0.0; n + 1];
    let mut effective_interest = vec![0.0; n];
    let mut amortization = vec![0.0; n];
    let mut eir = vec![0.0; n];
    let mut solutions = Vec::with_capacity(starts.len());
    let mut solve_time = Duration::ZERO;
    capitalized_costs[0] = deal.capitalized_finance_cost();

    for (k, (reset, &start)) in deal.resets().iter().zip(&starts).enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(n);
        let remaining = n - start;
        let sub_dates = &dates[start..];

        let nominal = accrue(
            sub_dates,
            &vec![reset.rate; remaining],
            deal.day_count(),
            deal.frequency(),
            &balances[start..],
            remaining,
        );
        let flows = assemble(
            balances[start],
            capitalized_costs[start],
            deal.structure(),
            &nominal,
            remaining,
        );

        let timer = Instant::now();
        let result = calculate_effective_interest(
            reset.rate,
            sub_dates,
            &flows,
            &nominal,
            capitalized_costs[start],
            config,
        )?;
        solve_time += timer.elapsed();

        tracing::debug!(
            reset = %reset.date,
            nominal_rate = reset.rate,
            effective_rate = result.solution.rate,
            periods = end - start,
            "reset re-estimated"
        );

        let series = &result.series;
        if start == 0 {
            cash_flows[0] = flows[0];
        }
        for j in start..end {
            let local = j - start;
            nominal_interest[j] = nominal[local];
            cash_flows[j + 1] = flows[local + 1];
            amortized_cost[j] = series.amortized_cost[local];
            effective_interest[j] = series.effective_interest[local];
            amortization[j] = series.amortization[local];
            eir[j] = series.eir[local];
            capitalized_costs[j + 1] = series.capitalized_costs[local + 1];
        }
        if end == n {
            amortized_cost[n] = series.amortized_cost[remaining];
        }
        solutions.push(result.solution);
    }

    tracing::info!(
        deal_id = deal.deal_id(),
        method = %Method::Complex,
        solves = solutions.len(),
        elapsed_ms = solve_time.as_secs_f64() * 1_000.0,
        "schedule computed"
    );

    Ok(EirSchedule {
        method: Method::Complex,
        dates: dates.to_vec(),
        principal_balances: balances,
        rates: period_rates(deal.resets(), dates),
        nominal_interest,
        cash_flows,
        capitalized_costs,
        amortized_cost,
        effective_interest,
        amortization,
        eir,
        solutions,
        timings: MethodTimings::same(solve_time),
    })
}

/// Builds the schedule from a single solve at the first rate.
///
/// With more than one rate, nominal interest and cash flows are recomputed
/// at the period rates while amortized cost, amortization and capitalized
/// finance cost keep their inception values. Effective interest becomes
/// the unrounded sum of nominal interest and amortization, and the EIR is
/// annualized from that sum over the inception amortized cost.
///
/// # Errors
///
/// Returns any error from the inception solve.
pub fn simple_method(deal: &Deal, config: &EngineConfig) -> EngineResult<EirSchedule> {
    let dates = deal.schedule().dates();
    let n = deal.number_of_payments();
    let balances = principal_balances(deal.structure(), deal.principal(), n);
    let first_rate = deal
        .resets()
        .first()
        .map_or(deal.interest_rate(), |reset| reset.rate);

    let rates = vec![first_rate; n];
    let nominal_interest = accrue(dates, &rates, deal.day_count(), deal.frequency(), &balances, n);
    let cash_flows = assemble(
        deal.principal(),
        deal.capitalized_finance_cost(),
        deal.structure(),
        &nominal_interest,
        n,
    );

    let timer = Instant::now();
    let result = calculate_effective_interest(
        deal.interest_rate(),
        dates,
        &cash_flows,
        &nominal_interest,
        deal.capitalized_finance_cost(),
        config,
    )?;
    let solve_time = timer.elapsed();

    let mut schedule = EirSchedule {
        method: Method::Simple,
        dates: dates.to_vec(),
        principal_balances: balances,
        rates,
        nominal_interest,
        cash_flows,
        capitalized_costs: result.series.capitalized_costs,
        amortized_cost: result.series.amortized_cost,
        effective_interest: result.series.effective_interest,
        amortization: result.series.amortization,
        eir: result.series.eir,
        solutions: vec![result.solution],
        timings: MethodTimings::same(solve_time),
    };

    if deal.resets().len() > 1 {
        schedule.rates = period_rates(deal.resets(), dates);
        schedule.nominal_interest = accrue(
            dates,
            &schedule.rates,
            deal.day_count(),
            deal.frequency(),
            &schedule.principal_balances,
            n,
        );
        schedule.cash_flows = assemble(
            deal.principal(),
            deal.capitalized_finance_cost(),
            deal.structure(),
            &schedule.nominal_interest,
            n,
        );

        let timer = Instant::now();
        let (effective_interest, eir) = shift_effective_interest(
            dates,
            &schedule.nominal_interest,
            &schedule.amortization,
            &schedule.amortized_cost,
        );
        schedule.timings.simple_seconds = timer.elapsed().as_secs_f64();
        schedule.effective_interest = effective_interest;
        schedule.eir = eir;
    }

    tracing::info!(
        deal_id = deal.deal_id(),
        method = %Method::Simple,
        complex_ms = schedule.timings.complex_seconds * 1_000.0,
        simple_ms = schedule.timings.simple_seconds * 1_000.0,
        "schedule computed"
    );

    Ok(schedule)
}

/// Effective interest and EIR from new nominal interest and fixed amortization.
fn shift_effective_interest(
    dates: &[Date],
    nominal_interest: &[f64],
    amortization: &[f64],
    amortized_cost: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    dates
        .windows(2)
        .zip(nominal_interest)
        .zip(amortization)
        .zip(amortized_cost)
        .map(|(((period, &nominal), &amortization), &opening)| {
            let effective = nominal + amortization;
            let days = period[0].days_between(&period[1]) as f64;
            (effective, disclosed_eir(effective, opening, days))
        })
        .unzip()
}
