//! Metric identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// A windowed metric the ratio engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Annualised standard deviation of returns.
    Volatility,
    /// Rolling covariance over benchmark variance.
    Beta,
    /// Excess cumulative return beyond the beta-implied return.
    Alpha,
    /// Excess return per unit of beta.
    Treynor,
    /// Annualised excess return per unit of tracking volatility.
    Sharpe,
    /// Annualised excess return per unit of downside tracking volatility.
    Sortino,
    /// Decline from the trailing peak.
    Drawdown,
    /// Up-market growth relative to the benchmark's.
    UpsideCapture,
    /// Down-market growth relative to the benchmark's.
    DownsideCapture,
}

impl Metric {
    /// All metrics, in display order.
    pub const ALL: [Metric; 9] = [
        Metric::Volatility,
        Metric::Beta,
        Metric::Alpha,
        Metric::Treynor,
        Metric::Sharpe,
        Metric::Sortino,
        Metric::Drawdown,
        Metric::UpsideCapture,
        Metric::DownsideCapture,
    ];

    /// Returns the canonical snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Volatility => "volatility",
            Metric::Beta => "beta",
            Metric::Alpha => "alpha",
            Metric::Treynor => "treynor",
            Metric::Sharpe => "sharpe",
            Metric::Sortino => "sortino",
            Metric::Drawdown => "drawdown",
            Metric::UpsideCapture => "upside_capture",
            Metric::DownsideCapture => "downside_capture",
        }
    }

    /// Returns true if the metric compares against a benchmark.
    #[must_use]
    pub fn requires_benchmark(self) -> bool {
        !matches!(self, Metric::Volatility | Metric::Drawdown)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| AnalyticsError::invalid_input(format!("unknown metric: {s}")))
    }
}
