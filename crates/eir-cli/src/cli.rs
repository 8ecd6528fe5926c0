//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{BatchArgs, CompareArgs, ConfigArgs, ScheduleArgs};

/// Amortis - Effective interest rate amortization schedules
#[derive(Parser)]
#[command(name = "eir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, else table)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the amortized cost schedule of a deal
    Schedule(ScheduleArgs),

    /// Compare the complex and simple methods on a deal
    Compare(CompareArgs),

    /// Compute schedules for several deal files
    Batch(BatchArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Minimal output (just the value)
    Minimal,
}

impl OutputFormat {
    /// Parses a configured format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "minimal" => Some(OutputFormat::Minimal),
            _ => None,
        }
    }
}

/// Method selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Re-solve from every rate reset
    Complex,
    /// Solve once and shift by the nominal change
    Simple,
}

impl From<MethodArg> for eir_engine::floating::Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Complex => eir_engine::floating::Method::Complex,
            MethodArg::Simple => eir_engine::floating::Method::Simple,
        }
    }
}
