//! Side-by-side comparison of the complex and simple methods.
//!
//! Both methods are run on the same deal. Per-period rows compare effective
//! interest and EIR; per-year rows sum effective interest over each
//! calendar year and take the other figures at the year's last date. Row 0
//! counts as zero effective interest, and a first year whose simple total
//! is zero is left out.

use eir_core::{Currency, Date};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::deal::Deal;
use crate::error::EngineResult;
use crate::floating::{complex_method, simple_method, EirSchedule};
use crate::report::rate_percent;

/// Comparison of one payment period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Payment date.
    pub date: Date,
    /// Principal outstanding at the start of the period.
    pub principal_balance: f64,
    /// Nominal rate in percent, 2 dp.
    pub nominal_rate: f64,
    /// Effective interest under the complex method.
    pub complex_effective_interest: f64,
    /// Effective interest under the simple method.
    pub simple_effective_interest: f64,
    /// EIR under the complex method, in percent.
    pub complex_eir: f64,
    /// EIR under the simple method, in percent.
    pub simple_eir: f64,
    /// Complex minus simple effective interest.
    pub absolute_difference: f64,
    /// Absolute difference in percent of the complex effective interest.
    pub relative_difference: Option<f64>,
    /// Complex minus simple EIR, in percentage points.
    pub eir_difference: f64,
}

/// Comparison of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummaryRow {
    /// Calendar year.
    pub year: i32,
    /// Principal outstanding at the year's last date.
    pub principal_balance: f64,
    /// Nominal rate at the year's last date, in percent.
    pub nominal_rate: Option<f64>,
    /// Complex effective interest summed over the year.
    pub complex_effective_interest: f64,
    /// Simple effective interest summed over the year.
    pub simple_effective_interest: f64,
    /// Complex EIR at the year's last date.
    pub complex_eir: Option<f64>,
    /// Simple EIR at the year's last date.
    pub simple_eir: Option<f64>,
    /// Complex minus simple effective interest.
    pub absolute_difference: f64,
    /// Absolute difference in percent of the complex effective interest.
    pub relative_difference: Option<f64>,
    /// Complex minus simple EIR at the year's last date.
    pub eir_difference: Option<f64>,
}

/// The full method comparison of a deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Deal identifier.
    pub deal_id: String,
    /// Functional currency.
    pub currency: Currency,
    /// One row per payment.
    pub rows: Vec<ComparisonRow>,
    /// One row per calendar year.
    pub years: Vec<YearSummaryRow>,
    /// Seconds spent on the full solve.
    pub complex_seconds: f64,
    /// Seconds spent on the shortcut.
    pub simple_seconds: f64,
    /// `complex_seconds / simple_seconds - 1`, if the simple time is non-zero.
    pub efficiency: Option<f64>,
}

/// Runs both methods on `deal` and compares them.
///
/// Timings come from the simple method run, which times the inception
/// solve and the shortcut separately.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a solve fails.
pub fn compare(deal: &Deal, config: &EngineConfig) -> EngineResult<ComparisonReport> {
    config.validate()?;
    let simple = simple_method(deal, config)?;
    let complex = complex_method(deal, config)?;

    let rows = period_rows(&complex, &simple);
    let years = year_rows(&complex, &simple);
    let timings = simple.timings;

    tracing::info!(
        deal_id = deal.deal_id(),
        periods = rows.len(),
        years = years.len(),
        efficiency = ?timings.efficiency(),
        "methods compared"
    );

    Ok(ComparisonReport {
        deal_id: deal.deal_id().to_string(),
        currency: deal.currency(),
        rows,
        years,
        complex_seconds: timings.complex_seconds,
        simple_seconds: timings.simple_seconds,
        efficiency: timings.efficiency(),
    })
}

fn relative(difference: f64, base: f64) -> Option<f64> {
    (base != 0.0).then(|| difference / base * 100.0)
}

fn period_rows(complex: &EirSchedule, simple: &EirSchedule) -> Vec<ComparisonRow> {
    (0..complex.number_of_payments().min(simple.number_of_payments()))
        .map(|i| {
            let complex_effective = complex.effective_interest[i];
            let simple_effective = simple.effective_interest[i];
            let difference = complex_effective - simple_effective;
            ComparisonRow {
                date: complex.dates[i + 1],
                principal_balance: complex.principal_balances[i],
                nominal_rate: rate_percent(complex.rates[i]),
                complex_effective_interest: complex_effective,
                simple_effective_interest: simple_effective,
                complex_eir: complex.eir[i],
                simple_eir: simple.eir[i],
                absolute_difference: difference,
                relative_difference: relative(difference, complex_effective),
                eir_difference: complex.eir[i] - simple.eir[i],
            }
        })
        .collect()
}

/// Effective interest booked on date `j` (zero at inception).
fn booked(schedule: &EirSchedule, j: usize) -> f64 {
    j.checked_sub(1)
        .and_then(|p| schedule.effective_interest.get(p))
        .copied()
        .unwrap_or(0.0)
}

/// Period value reported on date `j` (none at inception).
fn reported(column: &[f64], j: usize) -> Option<f64> {
    j.checked_sub(1).and_then(|p| column.get(p)).copied()
}

fn year_rows(complex: &EirSchedule, simple: &EirSchedule) -> Vec<YearSummaryRow> {
    // (year, complex total, simple total, index of the last date in the year)
    let mut totals: Vec<(i32, f64, f64, usize)> = Vec::new();
    for (j, date) in simple.dates.iter().enumerate() {
        let year = date.year();
        match totals.iter_mut().find(|(y, ..)| *y == year) {
            Some(entry) => {
                entry.1 += booked(complex, j);
                entry.2 += booked(simple, j);
                if simple.dates[entry.3] < *date {
                    entry.3 = j;
                }
            }
            None => totals.push((year, booked(complex, j), booked(simple, j), j)),
        }
    }

    if totals.first().is_some_and(|&(_, _, simple_total, _)| simple_total == 0.0) {
        totals.remove(0);
    }

    totals
        .into_iter()
        .map(|(year, complex_total, simple_total, last)| {
            let complex_eir = reported(&complex.eir, last);
            let simple_eir = reported(&simple.eir, last);
            let difference = complex_total - simple_total;
            YearSummaryRow {
                year,
                principal_balance: simple.principal_balances[last],
                nominal_rate: reported(&simple.rates, last).map(rate_percent),
                complex_effective_interest: complex_total,
                simple_effective_interest: simple_total,
                complex_eir,
                simple_eir,
                absolute_difference: difference,
                relative_difference: relative(difference, complex_total),
                eir_difference: complex_eir.zip(simple_eir).map(|(c, s)| c - s),
            }
        })
        .collect()
}
