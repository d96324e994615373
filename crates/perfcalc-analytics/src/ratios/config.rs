//! Configuration for ratio computation.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Default number of return periods per year (trading days).
pub const DEFAULT_ANNUALISER: u32 = 250;

/// Configuration for a [`RatioEngine`](super::RatioEngine).
///
/// Every field has a default, so a partial TOML or JSON document
/// deserializes into a complete config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    /// Return periods per year. Scales volatility by `√annualiser` and
    /// compounds mean returns to annual figures.
    pub annualiser: u32,

    /// Annual risk-free rate as a fraction (0.05 for 5%).
    /// Used to synthesize a benchmark when no benchmark series is given.
    pub risk_free_rate: Option<f64>,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            annualiser: DEFAULT_ANNUALISER,
            risk_free_rate: None,
        }
    }
}

impl RatioConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of return periods per year.
    #[must_use]
    pub fn with_annualiser(mut self, annualiser: u32) -> Self {
        self.annualiser = annualiser;
        self
    }

    /// Sets the annual risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Checks that the config can drive an engine.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.annualiser == 0 {
            return Err(AnalyticsError::configuration("annualiser must be positive"));
        }
        if let Some(rate) = self.risk_free_rate {
            if !rate.is_finite() || rate <= -(f64::from(self.annualiser)) {
                return Err(AnalyticsError::configuration(format!(
                    "risk-free rate {rate} cannot compound"
                )));
            }
        }
        Ok(())
    }

    /// Annualiser as a float, for use in formulas.
    pub(crate) fn periods(&self) -> f64 {
        f64::from(self.annualiser)
    }
}
