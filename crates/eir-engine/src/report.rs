//! Per-period schedule reports.

use eir_core::rounding::round_dp;
use eir_core::{Currency, Date};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::deal::Deal;
use crate::error::EngineResult;
use crate::floating::{reestimate, EirSchedule, Method, MethodTimings};
use crate::solver::RateSolution;

/// One row of a schedule report.
///
/// Row 0 is inception: it carries balances and the initial cash flow, and
/// leaves the per-period fields empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    /// Deal identifier.
    pub deal_id: String,
    /// Payment date (start date for row 0).
    pub date: Date,
    /// Functional currency.
    pub currency: Currency,
    /// Principal outstanding at the date.
    pub principal_balance: f64,
    /// Nominal rate in percent, 2 dp.
    pub nominal_rate: Option<f64>,
    /// Nominal interest of the period ending at the date.
    pub nominal_interest: Option<f64>,
    /// Total cash flow at the date.
    pub total_cash_flow: f64,
    /// Unamortized capitalized finance cost at the date.
    pub capitalized_finance_costs: f64,
    /// Amortized cost at the date.
    pub amortized_cost: f64,
    /// Effective interest of the period ending at the date.
    pub effective_interest: Option<f64>,
    /// Amortization of the period ending at the date.
    pub amortization_schedule: Option<f64>,
    /// Annualized effective interest rate in percent.
    pub effective_interest_rate: Option<f64>,
}

/// A deal's schedule as report rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    /// Deal identifier.
    pub deal_id: String,
    /// Functional currency.
    pub currency: Currency,
    /// Method used.
    pub method: Method,
    /// One row per date, inception first.
    pub records: Vec<PeriodRecord>,
    /// Solved effective interest rates.
    pub solutions: Vec<RateSolution>,
    /// Solve timings.
    pub timings: MethodTimings,
}

impl ScheduleReport {
    /// Returns the number of payments.
    #[must_use]
    pub fn number_of_payments(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    /// Returns the closing row.
    #[must_use]
    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }
}

/// Converts a decimal rate to percent, 2 dp.
#[must_use]
pub fn rate_percent(rate: f64) -> f64 {
    round_dp(rate * 100.0, 2)
}

/// Lays out a schedule as report rows.
#[must_use]
pub fn compose(deal: &Deal, schedule: &EirSchedule) -> ScheduleReport {
    let period = |column: &[f64], i: usize| i.checked_sub(1).and_then(|p| column.get(p)).copied();
    let at = |column: &[f64], i: usize| column.get(i).copied().unwrap_or_default();

    let records = schedule
        .dates
        .iter()
        .enumerate()
        .map(|(i, &date)| PeriodRecord {
            deal_id: deal.deal_id().to_string(),
            date,
            currency: deal.currency(),
            principal_balance: at(&schedule.principal_balances, i),
            nominal_rate: period(&schedule.rates, i).map(rate_percent),
            nominal_interest: period(&schedule.nominal_interest, i),
            total_cash_flow: at(&schedule.cash_flows, i),
            capitalized_finance_costs: at(&schedule.capitalized_costs, i),
            amortized_cost: at(&schedule.amortized_cost, i),
            effective_interest: period(&schedule.effective_interest, i),
            amortization_schedule: period(&schedule.amortization, i),
            effective_interest_rate: period(&schedule.eir, i),
        })
        .collect();

    ScheduleReport {
        deal_id: deal.deal_id().to_string(),
        currency: deal.currency(),
        method: schedule.method,
        records,
        solutions: schedule.solutions.clone(),
        timings: schedule.timings,
    }
}

/// Computes the schedule of `deal` with `method` and lays it out as a report.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a solve fails.
///
/// # Example
///
/// ```rust,no_run
/// use eir_engine::prelude::*;
///
/// # fn example(terms: DealTerms) -> EngineResult<()> {
/// let deal = Deal::from_terms(terms)?;
/// let report = run(&deal, Method::Complex, &EngineConfig::default())?;
///
/// for record in &report.records {
///     println!("{} {:.2}", record.date, record.amortized_cost);
/// }
/// # Ok(())
/// # }
/// ```
pub fn run(deal: &Deal, method: Method, config: &EngineConfig) -> EngineResult<ScheduleReport> {
    config.validate()?;
    let schedule = reestimate(deal, method, config)?;
    Ok(compose(deal, &schedule))
}
