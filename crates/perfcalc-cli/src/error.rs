//! CLI error types.

use std::path::PathBuf;

use perfcalc_analytics::AnalyticsError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unknown metric name.
    #[error("Unknown metric: {0}. Use one of: {1}.")]
    UnknownMetric(String, String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Calculation error.
    #[error("Calculation error: {0}")]
    Calculation(#[from] AnalyticsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
