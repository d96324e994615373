//! Standalone functions, one per metric.
//!
//! Each function normalizes its inputs, builds a [`RatioEngine`], computes
//! one metric, and returns either the most recent value or the full column.
//! To compute several metrics on the same data, build the engine once with
//! [`get_ratio_engine`] instead.
//!
//! # Example
//!
//! ```rust
//! use perfcalc_analytics::functions::{get_volatility, MetricRequest};
//! use perfcalc_analytics::inputs::NavInput;
//! use perfcalc_core::types::Date;
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let navs: Vec<(Date, f64)> = [100.0, 101.0, 99.5, 102.0, 103.5]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| (start.add_days(i as i64), v))
//!     .collect();
//!
//! let request = MetricRequest::new().with_window(3);
//! let vol = get_volatility(NavInput::from(navs), &request).unwrap();
//!
//! assert!(vol.tail().unwrap() > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;
use crate::inputs::{CashFlowInput, NavInput};
use crate::ratios::{Metric, MetricSeries, RatioConfig, RatioEngine, DEFAULT_ANNUALISER};
use crate::xirr::XirrSolver;

/// Default rolling window: three years of trading days.
pub const DEFAULT_WINDOW: usize = 3 * DEFAULT_ANNUALISER as usize;

// ============================================================================
// REQUEST / OUTPUT
// ============================================================================

/// Parameters shared by the per-metric functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRequest {
    /// Rolling window in rows.
    pub window: usize,
    /// Return periods per year.
    pub annualiser: u32,
    /// Annual risk-free rate, used when no benchmark is given.
    pub risk_free_rate: Option<f64>,
    /// Return only the most recent value.
    pub tail: bool,
}

impl Default for MetricRequest {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            annualiser: DEFAULT_ANNUALISER,
            risk_free_rate: None,
            tail: true,
        }
    }
}

impl MetricRequest {
    /// Creates a request with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rolling window.
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the return periods per year.
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

    /// Sets whether only the most recent value is returned.
    #[must_use]
    pub fn with_tail(mut self, tail: bool) -> Self {
        self.tail = tail;
        self
    }

    /// Engine configuration for this request.
    #[must_use]
    pub fn ratio_config(&self) -> RatioConfig {
        RatioConfig {
            annualiser: self.annualiser,
            risk_free_rate: self.risk_free_rate,
        }
    }
}

/// Result of a per-metric function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricOutput {
    /// The value on the most recent row.
    Tail(Option<f64>),
    /// The full column.
    Series(MetricSeries),
}

impl MetricOutput {
    fn from_series(series: MetricSeries, tail: bool) -> Self {
        if tail {
            MetricOutput::Tail(series.tail())
        } else {
            MetricOutput::Series(series)
        }
    }

    /// Returns the most recent value, whichever form this is.
    #[must_use]
    pub fn tail(&self) -> Option<f64> {
        match self {
            MetricOutput::Tail(value) => *value,
            MetricOutput::Series(series) => series.tail(),
        }
    }

    /// Returns the full column, if this is one.
    #[must_use]
    pub fn series(&self) -> Option<&MetricSeries> {
        match self {
            MetricOutput::Tail(_) => None,
            MetricOutput::Series(series) => Some(series),
        }
    }
}

// ============================================================================
// XIRR
// ============================================================================

/// Calculates the XIRR of a set of cash flows, as a percentage.
///
/// `Ok(None)` means the flows are valid but no rate was found (flows all of
/// one sign, or no convergence from any guess).
pub fn get_xirr(cash_flows: impl Into<CashFlowInput>) -> AnalyticsResult<Option<f64>> {
    let flows = cash_flows.into().into_cash_flows()?;
    Ok(XirrSolver::new().solve(&flows, None))
}

// ============================================================================
// RATIOS
// ============================================================================

/// Builds a reusable engine from raw inputs.
pub fn get_ratio_engine(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    risk_free_rate: Option<f64>,
    annualiser: u32,
) -> AnalyticsResult<RatioEngine> {
    let config = RatioConfig {
        annualiser,
        risk_free_rate,
    };
    build_engine(nav.into(), benchmark, config)
}

/// Decline from the trailing peak within each window.
pub fn get_drawdown(nav: impl Into<NavInput>, request: &MetricRequest) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Drawdown, nav.into(), None, request)
}

/// Annualised volatility of periodic returns.
pub fn get_volatility(nav: impl Into<NavInput>, request: &MetricRequest) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Volatility, nav.into(), None, request)
}

/// Sharpe ratio against a benchmark or the risk-free rate.
pub fn get_sharpe(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Sharpe, nav.into(), benchmark, request)
}

/// Sortino ratio against a benchmark or the risk-free rate.
pub fn get_sortino(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Sortino, nav.into(), benchmark, request)
}

/// Treynor ratio against a benchmark or the risk-free rate.
pub fn get_treynor(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Treynor, nav.into(), benchmark, request)
}

/// Alpha against a benchmark or the risk-free rate.
pub fn get_alpha(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Alpha, nav.into(), benchmark, request)
}

/// Rolling beta against a benchmark or the risk-free rate.
pub fn get_beta(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::Beta, nav.into(), benchmark, request)
}

/// Upside capture ratio against a benchmark or the risk-free rate.
pub fn get_upside_capture(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::UpsideCapture, nav.into(), benchmark, request)
}

/// Downside capture ratio against a benchmark or the risk-free rate.
pub fn get_downside_capture(
    nav: impl Into<NavInput>,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    compute_metric(Metric::DownsideCapture, nav.into(), benchmark, request)
}

/// Computes any metric from raw inputs.
pub fn compute_metric(
    metric: Metric,
    nav: NavInput,
    benchmark: Option<NavInput>,
    request: &MetricRequest,
) -> AnalyticsResult<MetricOutput> {
    let engine = build_engine(nav, benchmark, request.ratio_config())?;
    let series = engine.compute(metric, request.window)?;
    Ok(MetricOutput::from_series(series, request.tail))
}

fn build_engine(
    nav: NavInput,
    benchmark: Option<NavInput>,
    config: RatioConfig,
) -> AnalyticsResult<RatioEngine> {
    let primary = nav.into_series()?;
    let benchmark = benchmark.map(NavInput::into_series).transpose()?;
    RatioEngine::new(primary, benchmark, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use approx::assert_relative_eq;
    use perfcalc_core::types::Date;

    fn navs(values: &[f64]) -> Vec<(Date, f64)> {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start.add_days(i as i64), v))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let request = MetricRequest::default();
        assert_eq!(request.window, 750);
        assert_eq!(request.annualiser, 250);
        assert!(request.tail);
        assert!(request.risk_free_rate.is_none());
    }

    #[test]
    fn test_default_window_longer_than_data_is_none() {
        let out = get_volatility(navs(&[100.0, 101.0, 102.0]), &MetricRequest::new()).unwrap();
        assert_eq!(out, MetricOutput::Tail(None));
    }

    #[test]
    fn test_tail_matches_series() {
        let data = navs(&[100.0, 101.0, 99.0, 103.0, 104.0, 102.0]);
        let request = MetricRequest::new().with_window(3);

        let tail = get_drawdown(data.clone(), &request).unwrap();
        let full = get_drawdown(data, &request.with_tail(false)).unwrap();

        assert!(full.series().is_some());
        assert_eq!(full.series().unwrap().len(), 6);
        assert_relative_eq!(tail.tail().unwrap(), full.tail().unwrap());
        assert_relative_eq!(tail.tail().unwrap(), 102.0 / 104.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_benchmark_metric_without_benchmark() {
        let err = get_beta(navs(&[100.0, 101.0, 102.0]), None, &MetricRequest::new()).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingBenchmark { .. }));
    }

    #[test]
    fn test_beta_against_self() {
        let data = navs(&[100.0, 101.0, 99.0, 103.0, 104.0, 102.0]);
        let request = MetricRequest::new().with_window(4);
        let beta = get_beta(data.clone(), Some(data.into()), &request).unwrap();
        assert_relative_eq!(beta.tail().unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_risk_free_rate_enables_sharpe() {
        let data = navs(&[100.0, 101.0, 99.0, 103.0, 104.0, 102.0]);
        let request = MetricRequest::new().with_window(4).with_risk_free_rate(0.03);
        assert!(get_sharpe(data, None, &request).unwrap().tail().is_some());
    }

    #[test]
    fn test_get_xirr() {
        let start = Date::from_ymd(2020, 1, 1).unwrap();
        let end = Date::from_ymd(2021, 1, 1).unwrap();
        let rate = get_xirr(vec![(start, -1000.0), (end, 1100.0)]).unwrap().unwrap();
        assert_relative_eq!(rate, 9.971_358_593_414_136, epsilon = 1e-6);

        assert_eq!(get_xirr(vec![(start, 1000.0), (end, 1100.0)]).unwrap(), None);
    }

    #[test]
    fn test_ratio_engine_reuse() {
        let data = navs(&[100.0, 101.0, 99.0, 103.0, 104.0, 102.0]);
        let engine = get_ratio_engine(data.clone(), Some(data.into()), None, 250).unwrap();
        engine.beta(3).unwrap();
        engine.alpha(3).unwrap();
        assert_eq!(engine.cached_beta_windows(), 1);
    }
}
