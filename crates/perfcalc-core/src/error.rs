//! Error types for the Perfcalc core types.
//!
//! Validation failures raised while building canonical dates, cash flows
//! and valuation series.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core type construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Valuation series violates ordering, uniqueness or value constraints.
    #[error("Invalid time series: {reason}")]
    InvalidSeries {
        /// Description of the violated constraint.
        reason: String,
    },

    /// Invalid cash flow.
    #[error("Invalid cash flow: {reason}")]
    InvalidCashFlow {
        /// Description of the invalid cash flow.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid series error.
    #[must_use]
    pub fn invalid_series(reason: impl Into<String>) -> Self {
        Self::InvalidSeries {
            reason: reason.into(),
        }
    }

    /// Creates an invalid cash flow error.
    #[must_use]
    pub fn invalid_cash_flow(reason: impl Into<String>) -> Self {
        Self::InvalidCashFlow {
            reason: reason.into(),
        }
    }
}
