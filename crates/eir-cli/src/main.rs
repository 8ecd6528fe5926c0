//! Amortis CLI - Effective interest rate amortization from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Amortized cost schedule of a deal
//! eir schedule deal.json --method complex
//!
//! # Compare the complex and simple methods
//! eir compare deal.yaml
//!
//! # Schedules for a set of deals
//! eir batch deals/*.json --format json
//!
//! # Persist a default
//! eir config set default_method simple
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::config::Config;
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = Config::load()?;
    let format = cli.format.or_else(|| config.format()).unwrap_or_default();
    let context = Context {
        format,
        quiet: cli.quiet,
        config,
    };

    match cli.command {
        Commands::Schedule(args) => commands::schedule::execute(args, &context)?,
        Commands::Compare(args) => commands::compare::execute(args, &context)?,
        Commands::Batch(args) => commands::batch::execute(args, &context)?,
        Commands::Config(args) => commands::config::execute(args, &context)?,
    }

    Ok(())
}

/// Logs go to stderr so that JSON output on stdout stays parseable.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
