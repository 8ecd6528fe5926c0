//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Deal file extension not recognised.
    #[error("Unsupported deal file: {0}. Use a .json, .yaml or .yml file.")]
    UnsupportedFile(PathBuf),

    /// Deal file could not be parsed.
    #[error("Invalid deal file {path}: {reason}")]
    InvalidDealFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Deal terms were rejected.
    #[error("Deal {path} rejected: {source}")]
    RejectedDeal {
        /// File the deal came from.
        path: PathBuf,
        /// Validation failure.
        source: eir_engine::EngineError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
