//! Batch command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use eir_engine::batch::run_batch;
use eir_engine::deal::Deal;
use eir_engine::floating::Method;
use eir_engine::report::ScheduleReport;

use super::{load_deal, Context, SolverArgs};
use crate::cli::{MethodArg, OutputFormat};
use crate::output::{
    format_amount, format_percent, print_error, print_header, print_json, print_output,
};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Deal terms files (.json, .yaml or .yml)
    #[arg(required = true, num_args = 1..)]
    pub deals: Vec<PathBuf>,

    /// Re-estimation method (defaults to the configured method)
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Run sequentially even for large batches
    #[arg(long)]
    pub sequential: bool,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Result of one deal file.
#[derive(Debug, Serialize)]
struct BatchEntry {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ScheduleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct BatchRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Deal")]
    deal_id: String,
    #[tabled(rename = "Payments")]
    payments: String,
    #[tabled(rename = "Initial AC")]
    initial_amortized_cost: String,
    #[tabled(rename = "Closing AC")]
    closing_amortized_cost: String,
    #[tabled(rename = "First EIR")]
    first_eir: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl BatchRow {
    fn new(entry: &BatchEntry, precision: usize) -> Self {
        let file = entry.path.display().to_string();
        match (&entry.report, &entry.error) {
            (Some(report), _) => Self {
                file,
                deal_id: report.deal_id.clone(),
                payments: report.number_of_payments().to_string(),
                initial_amortized_cost: report
                    .records
                    .first()
                    .map(|r| format_amount(r.amortized_cost, precision))
                    .unwrap_or_default(),
                closing_amortized_cost: report
                    .last()
                    .map(|r| format_amount(r.amortized_cost, precision))
                    .unwrap_or_default(),
                first_eir: format_percent(
                    report.records.get(1).and_then(|r| r.effective_interest_rate),
                ),
                status: "ok".to_string(),
            },
            (None, error) => Self {
                file,
                deal_id: String::new(),
                payments: String::new(),
                initial_amortized_cost: String::new(),
                closing_amortized_cost: String::new(),
                first_eir: String::new(),
                status: error.clone().unwrap_or_default(),
            },
        }
    }
}

/// Execute the batch command.
pub fn execute(args: BatchArgs, context: &Context) -> Result<()> {
    let method = match args.method {
        Some(method) => Method::from(method),
        None => context.config.method()?,
    };
    let engine = context.engine_config(&args.solver)?.with_parallel(!args.sequential);

    // Files that fail to load keep their slot so output follows the input order
    let mut entries = Vec::with_capacity(args.deals.len());
    let mut deals: Vec<Deal> = Vec::new();
    let mut slots = Vec::new();
    for path in args.deals {
        match load_deal(&path) {
            Ok(deal) => {
                slots.push(entries.len());
                deals.push(deal);
                entries.push(BatchEntry {
                    path,
                    report: None,
                    error: None,
                });
            }
            Err(e) => entries.push(BatchEntry {
                path,
                report: None,
                error: Some(e.to_string()),
            }),
        }
    }

    for (slot, result) in slots.into_iter().zip(run_batch(&deals, method, &engine)) {
        match result {
            Ok(report) => entries[slot].report = Some(report),
            Err(e) => entries[slot].error = Some(e.to_string()),
        }
    }

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    tracing::info!(deals = entries.len(), failed, %method, "batch finished");

    match context.format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Minimal => {
            for entry in &entries {
                let closing = entry.report.as_ref().and_then(ScheduleReport::last);
                match (closing, &entry.error) {
                    (Some(last), _) => {
                        println!("{} {:.2}", entry.path.display(), last.amortized_cost);
                    }
                    (None, error) => {
                        let message = error.as_deref().unwrap_or("");
                        println!("{} error: {message}", entry.path.display());
                    }
                }
            }
        }
        OutputFormat::Table => {
            if !context.quiet {
                print_header(&format!("Batch of {} deals ({method} method)", entries.len()));
            }
            let rows: Vec<BatchRow> = entries
                .iter()
                .map(|entry| BatchRow::new(entry, context.precision()))
                .collect();
            print_output(&rows, context.format)?;
        }
    }

    if failed > 0 {
        print_error(&format!("{failed} of {} deals failed", entries.len()));
        anyhow::bail!("batch had {failed} failures");
    }
    Ok(())
}
