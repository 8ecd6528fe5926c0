//! Compare command implementation.
//!
//! Runs both re-estimation methods on a deal and shows their per-period and
//! per-year differences together with the solve timings.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use eir_engine::compare::{compare, ComparisonReport, ComparisonRow, YearSummaryRow};

use super::{load_deal, Context, SolverArgs};
use crate::cli::OutputFormat;
use crate::output::{
    format_amount, format_percent, print_header, print_json, print_minimal, print_output, KeyValue,
};

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Deal terms file (.json, .yaml or .yml)
    pub deal: PathBuf,

    /// Only show the per-year summary
    #[arg(long)]
    pub years_only: bool,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct PeriodRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Principal")]
    principal_balance: String,
    #[tabled(rename = "Rate")]
    nominal_rate: String,
    #[tabled(rename = "Complex EI")]
    complex: String,
    #[tabled(rename = "Simple EI")]
    simple: String,
    #[tabled(rename = "Difference")]
    difference: String,
    #[tabled(rename = "Relative")]
    relative: String,
    #[tabled(rename = "Complex EIR")]
    complex_eir: String,
    #[tabled(rename = "Simple EIR")]
    simple_eir: String,
    #[tabled(rename = "EIR Diff")]
    eir_difference: String,
}

impl PeriodRow {
    fn new(row: &ComparisonRow, precision: usize) -> Self {
        Self {
            date: row.date.to_string(),
            principal_balance: format_amount(row.principal_balance, precision),
            nominal_rate: format_percent(Some(row.nominal_rate)),
            complex: format_amount(row.complex_effective_interest, precision),
            simple: format_amount(row.simple_effective_interest, precision),
            difference: format_amount(row.absolute_difference, precision),
            relative: format_relative(row.relative_difference),
            complex_eir: format_percent(Some(row.complex_eir)),
            simple_eir: format_percent(Some(row.simple_eir)),
            eir_difference: format_points(Some(row.eir_difference)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Principal")]
    principal_balance: String,
    #[tabled(rename = "Rate")]
    nominal_rate: String,
    #[tabled(rename = "Complex EI")]
    complex: String,
    #[tabled(rename = "Simple EI")]
    simple: String,
    #[tabled(rename = "Difference")]
    difference: String,
    #[tabled(rename = "Relative")]
    relative: String,
    #[tabled(rename = "Complex EIR")]
    complex_eir: String,
    #[tabled(rename = "Simple EIR")]
    simple_eir: String,
    #[tabled(rename = "EIR Diff")]
    eir_difference: String,
}

impl YearRow {
    fn new(row: &YearSummaryRow, precision: usize) -> Self {
        Self {
            year: row.year,
            principal_balance: format_amount(row.principal_balance, precision),
            nominal_rate: format_percent(row.nominal_rate),
            complex: format_amount(row.complex_effective_interest, precision),
            simple: format_amount(row.simple_effective_interest, precision),
            difference: format_amount(row.absolute_difference, precision),
            relative: format_relative(row.relative_difference),
            complex_eir: format_percent(row.complex_eir),
            simple_eir: format_percent(row.simple_eir),
            eir_difference: format_points(row.eir_difference),
        }
    }
}

fn format_relative(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}%"))
}

fn format_points(value: Option<f64>) -> String {
    value.map(|v| format!("{v:+.2} pp")).unwrap_or_default()
}

/// Execute the compare command.
pub fn execute(args: CompareArgs, context: &Context) -> Result<()> {
    let deal = load_deal(&args.deal)?;
    let engine = context.engine_config(&args.solver)?;

    let report = compare(&deal, &engine)?;
    print_comparison(&report, args.years_only, context)
}

fn print_comparison(report: &ComparisonReport, years_only: bool, context: &Context) -> Result<()> {
    match context.format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Minimal => print_minimal(&report.years),
        OutputFormat::Table => {
            let precision = context.precision();

            if !years_only {
                if !context.quiet {
                    print_header(&format!("Deal {}: complex vs simple by period", report.deal_id));
                }
                let rows: Vec<PeriodRow> =
                    report.rows.iter().map(|row| PeriodRow::new(row, precision)).collect();
                print_output(&rows, context.format)?;
            }

            if !context.quiet {
                print_header("By calendar year");
            }
            let years: Vec<YearRow> =
                report.years.iter().map(|row| YearRow::new(row, precision)).collect();
            print_output(&years, context.format)?;

            if !context.quiet {
                print_header("Timings");
                print_output(&timings(report), context.format)?;
            }
            Ok(())
        }
    }
}

fn timings(report: &ComparisonReport) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Complex", format!("{:.6} s", report.complex_seconds)),
        KeyValue::new("Simple", format!("{:.6} s", report.simple_seconds)),
        KeyValue::new(
            "Efficiency",
            report
                .efficiency
                .map_or_else(|| "n/a".to_string(), |e| format!("{:.1}%", e * 100.0)),
        ),
    ]
}
