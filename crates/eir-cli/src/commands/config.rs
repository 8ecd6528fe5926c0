//! Config command implementation.
//!
//! Manages persisted CLI defaults. The file lives in the user config
//! directory (`eir/config.json`), or in `$EIR_CONFIG_DIR` when set.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use eir_engine::floating::Method;
use eir_engine::EngineConfig;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_output, print_success, print_warning, KeyValue};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "EIR_CONFIG_DIR";

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Default output format
    DefaultFormat,
    /// Default re-estimation method
    DefaultMethod,
    /// Largest accepted closing amortized cost
    ResidualThreshold,
    /// Solver iteration limit
    MaxIterations,
    /// Precision for amount output
    DecimalPrecision,
}

impl ConfigKey {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default_format" | "format" => Some(Self::DefaultFormat),
            "default_method" | "method" => Some(Self::DefaultMethod),
            "residual_threshold" | "threshold" => Some(Self::ResidualThreshold),
            "max_iterations" | "iterations" => Some(Self::MaxIterations),
            "decimal_precision" | "precision" => Some(Self::DecimalPrecision),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::DefaultFormat => "default_format",
            Self::DefaultMethod => "default_method",
            Self::ResidualThreshold => "residual_threshold",
            Self::MaxIterations => "max_iterations",
            Self::DecimalPrecision => "decimal_precision",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::DefaultFormat => "Default output format (table, json, minimal)",
            Self::DefaultMethod => "Default re-estimation method (complex, simple)",
            Self::ResidualThreshold => "Largest accepted closing amortized cost (number or none)",
            Self::MaxIterations => "Solver iteration limit (1-10000)",
            Self::DecimalPrecision => "Number of decimal places for amounts (0-10)",
        }
    }

    fn default_value(self) -> &'static str {
        match self {
            Self::DefaultFormat => "table",
            Self::DefaultMethod => "complex",
            Self::ResidualThreshold => "1.0",
            Self::MaxIterations => "100",
            Self::DecimalPrecision => "2",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DefaultFormat,
            Self::DefaultMethod,
            Self::ResidualThreshold,
            Self::MaxIterations,
            Self::DecimalPrecision,
        ]
    }

    fn lookup(s: &str) -> CliResult<Self> {
        Self::parse(s).ok_or_else(|| CliError::Config(format!("Unknown configuration key: {s}")))
    }
}

/// Persisted CLI settings.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Config {
    /// Loads the config file, or defaults when none exists.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn value(&self, key: ConfigKey) -> &str {
        self.values
            .get(key.as_str())
            .map_or(key.default_value(), String::as_str)
    }

    /// Output format set in the file, if any.
    pub fn format(&self) -> Option<OutputFormat> {
        self.values
            .get(ConfigKey::DefaultFormat.as_str())
            .and_then(|v| OutputFormat::parse(v))
    }

    /// Re-estimation method to use when none is given.
    pub fn method(&self) -> CliResult<Method> {
        self.value(ConfigKey::DefaultMethod)
            .parse()
            .map_err(|e: eir_engine::EngineError| CliError::Config(e.to_string()))
    }

    /// Decimal places for amounts.
    pub fn precision(&self) -> usize {
        self.value(ConfigKey::DecimalPrecision).parse().unwrap_or(2)
    }

    /// Engine settings built from the stored solver keys.
    pub fn engine_config(&self) -> CliResult<EngineConfig> {
        let threshold = parse_threshold(self.value(ConfigKey::ResidualThreshold))?;
        let iterations = parse_iterations(self.value(ConfigKey::MaxIterations))?;

        let mut config = EngineConfig::default().with_residual_threshold(threshold);
        config.solver.max_iterations = iterations;
        Ok(config)
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        self.values.insert(key.as_str().to_string(), value);
    }

    fn remove(&mut self, key: ConfigKey) {
        self.values.remove(key.as_str());
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join("config.json"));
    }
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(home.join("eir").join("config.json"))
}

/// Parses a residual threshold; `none` disables the check.
pub fn parse_threshold(value: &str) -> CliResult<Option<f64>> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(threshold) if threshold.is_finite() && threshold > 0.0 => Ok(Some(threshold)),
        _ => Err(CliError::Config(format!(
            "Invalid residual threshold: {value}. Use a positive number or none."
        ))),
    }
}

/// Parses a solver iteration limit.
pub fn parse_iterations(value: &str) -> CliResult<u32> {
    match value.parse::<u32>() {
        Ok(n) if (1..=10_000).contains(&n) => Ok(n),
        _ => Err(CliError::Config(format!(
            "Invalid iteration limit: {value}. Must be between 1 and 10000."
        ))),
    }
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, context: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(context),
        ConfigCommand::Get(get_args) => execute_get(get_args, context),
        ConfigCommand::Set(set_args) => execute_set(set_args),
        ConfigCommand::List => execute_list(context.format),
        ConfigCommand::Reset(reset_args) => execute_reset(reset_args),
        ConfigCommand::Path => execute_path(),
    }
}

fn execute_show(context: &Context) -> Result<()> {
    let config = &context.config;

    match context.format {
        OutputFormat::Table => {
            let results: Vec<KeyValue> = ConfigKey::all()
                .iter()
                .map(|key| KeyValue::new(key.as_str(), config.value(*key)))
                .collect();
            print_header("Current Configuration");
            print_output(&results, context.format)?;
        }
        OutputFormat::Json => {
            let output: BTreeMap<&str, &str> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), config.value(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}={}", key.as_str(), config.value(*key));
            }
        }
    }

    Ok(())
}

fn execute_get(args: GetArgs, context: &Context) -> Result<()> {
    let key = ConfigKey::lookup(&args.key)?;
    let value = context.config.value(key);

    match context.format {
        OutputFormat::Table => println!("{}: {}", key.as_str(), value),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => println!("{value}"),
    }

    Ok(())
}

fn execute_set(args: SetArgs) -> Result<()> {
    let key = ConfigKey::lookup(&args.key)?;
    validate_config_value(key, &args.value)?;

    let mut config = Config::load()?;
    config.set(key, args.value.clone());
    config.save()?;

    tracing::debug!(key = key.as_str(), value = %args.value, "configuration updated");
    print_success(&format!("Set {} = {}", key.as_str(), args.value));
    Ok(())
}

fn execute_list(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let results: Vec<KeyValue> = ConfigKey::all()
                .iter()
                .map(|key| {
                    KeyValue::new(
                        key.as_str(),
                        format!("{} (default: {})", key.description(), key.default_value()),
                    )
                })
                .collect();
            print_header("Available Configuration Keys");
            print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

fn execute_reset(args: ResetArgs) -> Result<()> {
    let mut config = Config::load()?;

    if args.all {
        config.clear();
        config.save()?;
        print_success("Reset all configuration to defaults");
    } else if let Some(key_str) = args.key {
        let key = ConfigKey::lookup(&key_str)?;
        config.remove(key);
        config.save()?;
        print_success(&format!("Reset {} to default ({})", key.as_str(), key.default_value()));
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

fn execute_path() -> Result<()> {
    let path = config_path()?;
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

fn validate_config_value(key: ConfigKey, value: &str) -> CliResult<()> {
    match key {
        ConfigKey::DefaultFormat => {
            if OutputFormat::parse(value).is_none() {
                return Err(CliError::Config(format!(
                    "Invalid format: {value}. Use table, json, or minimal."
                )));
            }
        }
        ConfigKey::DefaultMethod => {
            value
                .parse::<Method>()
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
        ConfigKey::ResidualThreshold => {
            parse_threshold(value)?;
        }
        ConfigKey::MaxIterations => {
            parse_iterations(value)?;
        }
        ConfigKey::DecimalPrecision => {
            let precision: u32 = value.parse().map_err(|_| {
                CliError::Config(format!("Invalid precision: {value}. Must be a number."))
            })?;
            if precision > 10 {
                return Err(CliError::Config(format!(
                    "Invalid precision: {precision}. Must be between 0 and 10."
                )));
            }
        }
    }
    Ok(())
}
