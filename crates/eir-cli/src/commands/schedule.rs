//! Schedule command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use eir_engine::floating::Method;
use eir_engine::report::{run, PeriodRecord, ScheduleReport};

use super::{load_deal, Context, SolverArgs};
use crate::cli::{MethodArg, OutputFormat};
use crate::output::{
    format_amount, format_optional, format_percent, print_header, print_json, print_minimal,
    print_output, KeyValue,
};

/// Arguments for the schedule command.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Deal terms file (.json, .yaml or .yml)
    pub deal: PathBuf,

    /// Re-estimation method (defaults to the configured method)
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// One schedule row for table display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ScheduleRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Principal")]
    pub principal_balance: String,
    #[tabled(rename = "Rate")]
    pub nominal_rate: String,
    #[tabled(rename = "Nominal")]
    pub nominal_interest: String,
    #[tabled(rename = "Cash Flow")]
    pub total_cash_flow: String,
    #[tabled(rename = "Cap. Costs")]
    pub capitalized_finance_costs: String,
    #[tabled(rename = "Amortized Cost")]
    pub amortized_cost: String,
    #[tabled(rename = "Effective")]
    pub effective_interest: String,
    #[tabled(rename = "Amortization")]
    pub amortization_schedule: String,
    #[tabled(rename = "EIR")]
    pub effective_interest_rate: String,
}

impl ScheduleRow {
    /// Formats a report row; inception fields stay blank.
    pub fn new(record: &PeriodRecord, precision: usize) -> Self {
        Self {
            date: record.date.to_string(),
            principal_balance: format_amount(record.principal_balance, precision),
            nominal_rate: format_percent(record.nominal_rate),
            nominal_interest: format_optional(record.nominal_interest, precision),
            total_cash_flow: format_amount(record.total_cash_flow, precision),
            capitalized_finance_costs: format_amount(record.capitalized_finance_costs, precision),
            amortized_cost: format_amount(record.amortized_cost, precision),
            effective_interest: format_optional(record.effective_interest, precision),
            amortization_schedule: format_optional(record.amortization_schedule, precision),
            effective_interest_rate: format_percent(record.effective_interest_rate),
        }
    }
}

/// Execute the schedule command.
pub fn execute(args: ScheduleArgs, context: &Context) -> Result<()> {
    let deal = load_deal(&args.deal)?;
    let method = match args.method {
        Some(method) => Method::from(method),
        None => context.config.method()?,
    };
    let engine = context.engine_config(&args.solver)?;

    let report = run(&deal, method, &engine)?;
    print_report(&report, context)
}

/// Prints a schedule report in the context's format.
pub fn print_report(report: &ScheduleReport, context: &Context) -> Result<()> {
    match context.format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Minimal => print_minimal(&report.records),
        OutputFormat::Table => {
            let precision = context.precision();
            if !context.quiet {
                print_header(&format!("Deal {} ({} method)", report.deal_id, report.method));
                print_output(&summary(report, precision), context.format)?;
            }
            let rows: Vec<ScheduleRow> = report
                .records
                .iter()
                .map(|record| ScheduleRow::new(record, precision))
                .collect();
            print_output(&rows, context.format)
        }
    }
}

fn summary(report: &ScheduleReport, precision: usize) -> Vec<KeyValue> {
    let mut results = vec![
        KeyValue::new("Currency", report.currency.to_string()),
        KeyValue::new("Payments", report.number_of_payments().to_string()),
    ];
    if let Some(first) = report.records.first() {
        results.push(KeyValue::from_amount(
            "Initial Amortized Cost",
            first.amortized_cost,
            precision,
        ));
    }
    if let Some(last) = report.last() {
        results.push(KeyValue::from_amount(
            "Closing Amortized Cost",
            last.amortized_cost,
            precision,
        ));
    }
    for (k, solution) in report.solutions.iter().enumerate() {
        results.push(KeyValue::new(
            format!("Solve {}", k + 1),
            format!(
                "rate {:.6}, {} iterations{}",
                solution.rate,
                solution.iterations,
                if solution.converged { "" } else { " (not converged)" }
            ),
        ));
    }
    results
}
