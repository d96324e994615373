//! Rolling risk and performance ratios.
//!
//! - [`ReturnsTable`]: periodic and cumulative returns, with benchmark
//!   columns joined on the primary dates
//! - [`RatioEngine`]: volatility, beta, alpha, treynor, sharpe, sortino,
//!   drawdown, upside and downside capture over a rolling window
//! - [`MetricSeries`]: the date-aligned output column of every metric
//!
//! # Formulas
//!
//! With `A` the annualiser and `r_p`, `r_b` the primary and benchmark
//! periodic returns inside the window:
//!
//! | Metric | Value |
//! |---|---|
//! | volatility | `std(r_p) · √A` |
//! | beta | `cov(r_p, r_b) / var(r_b)` |
//! | alpha | `cum_p - (cum_b + β · (cum_p - cum_b))` |
//! | treynor | `(r_p - r_b) / β` |
//! | sharpe | `((1 + mean r_p)^A - (1 + mean r_b)^A) / (std(r_p - r_b) · √A)` |
//! | sortino | as sharpe, with `std(min(r_p - r_b, 0))` |
//! | drawdown | `value / max(value) - 1` |
//! | upside capture | `(1 + g_p) / (1 + g_b)` over rows with `r_b > 0` |
//! | downside capture | `(1 - g_p) / (1 - g_b)` over rows with `r_b < 0` |
//!
//! Standard deviations and covariances are sample (n - 1) statistics;
//! `g` is compounded growth `Π(1 + r) - 1`.

mod cache;
mod config;
mod engine;
mod metric;
mod series;
mod table;

pub use cache::BetaCache;
pub use config::{RatioConfig, DEFAULT_ANNUALISER};
pub use engine::{RatioEngine, MIN_OBSERVATIONS};
pub use metric::Metric;
pub use series::{MetricPoint, MetricSeries};
pub use table::{
    cumulative_returns, periodic_returns, synthetic_values, BenchmarkColumns, BenchmarkSource,
    ReturnsRow, ReturnsTable, SYNTHETIC_BASE_VALUE,
};
