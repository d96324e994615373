//! Error types for the analytics engine.
//!
//! Solver non-convergence is not an error: [`crate::xirr`] reports it as
//! `None`. Errors here are raised for inputs the engine cannot work with.

use perfcalc_core::CoreError;
use thiserror::Error;

/// A specialized Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Unified error type for analytics operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Structurally invalid construction input.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Description of the invalid configuration.
        reason: String,
    },

    /// A benchmark-relative metric was requested without a benchmark series
    /// or a risk-free rate to synthesize one.
    #[error("{metric} requires a benchmark series or a risk-free rate")]
    MissingBenchmark {
        /// The metric that was requested.
        metric: String,
    },

    /// Raw input could not be normalized.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Canonical type validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AnalyticsError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a missing benchmark error.
    #[must_use]
    pub fn missing_benchmark(metric: impl Into<String>) -> Self {
        Self::MissingBenchmark {
            metric: metric.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::configuration("primary series needs at least 2 points");
        assert!(err.to_string().contains("at least 2 points"));

        let err = AnalyticsError::missing_benchmark("beta");
        assert_eq!(err.to_string(), "beta requires a benchmark series or a risk-free rate");
    }

    #[test]
    fn test_from_core_error() {
        let err: AnalyticsError = CoreError::invalid_series("unsorted").into();
        assert!(matches!(err, AnalyticsError::Core(_)));
        assert!(err.to_string().contains("unsorted"));
    }
}
