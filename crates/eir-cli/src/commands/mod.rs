//! CLI command implementations.

pub mod batch;
pub mod compare;
pub mod config;
pub mod schedule;

pub use batch::BatchArgs;
pub use compare::CompareArgs;
pub use config::ConfigArgs;
pub use schedule::ScheduleArgs;

use std::path::Path;

use clap::Args;
use eir_engine::deal::{Deal, DealTerms};
use eir_engine::EngineConfig;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Settings shared by every command.
pub struct Context {
    /// Resolved output format.
    pub format: OutputFormat,
    /// Suppress headers and informational messages.
    pub quiet: bool,
    /// Persisted defaults.
    pub config: config::Config,
}

/// Solver overrides accepted by the computing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Largest accepted closing amortized cost, or "none" to accept any
    #[arg(long, value_name = "AMOUNT")]
    pub residual_threshold: Option<String>,

    /// Solver iteration limit
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

impl Context {
    /// Engine settings from the config file with command-line overrides applied.
    pub fn engine_config(&self, solver: &SolverArgs) -> CliResult<EngineConfig> {
        let mut engine = self.config.engine_config()?;
        if let Some(threshold) = &solver.residual_threshold {
            engine.residual_threshold = config::parse_threshold(threshold)?;
        }
        if let Some(iterations) = solver.max_iterations {
            engine.solver.max_iterations = config::parse_iterations(&iterations.to_string())?;
        }
        Ok(engine)
    }

    /// Decimal places for amounts.
    pub fn precision(&self) -> usize {
        self.config.precision()
    }
}

/// Reads deal terms from a JSON or YAML file and validates them.
pub fn load_deal(path: &Path) -> CliResult<Deal> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let invalid = |reason: String| CliError::InvalidDealFile {
        path: path.to_path_buf(),
        reason,
    };
    let terms: DealTerms = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
        _ => return Err(CliError::UnsupportedFile(path.to_path_buf())),
    };

    let deal = Deal::from_terms(terms).map_err(|source| CliError::RejectedDeal {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        deal_id = deal.deal_id(),
        path = %path.display(),
        payments = deal.number_of_payments(),
        "deal loaded"
    );
    Ok(deal)
}
