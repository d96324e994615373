//! # Perfcalc Analytics
//!
//! Performance analytics engine for investment valuations and cash flows.
//!
//! - **XIRR**: money-weighted annual return of irregular cash flows, solved
//!   by Newton-Raphson with a ladder of fallback guesses
//! - **Ratios**: rolling volatility, beta, alpha, treynor, sharpe, sortino,
//!   drawdown, upside and downside capture against a benchmark series or a
//!   risk-free rate
//! - **Inputs**: adapters from pairs, columns and CSV into canonical series
//! - **Functions**: one call per metric, returning the latest value or the
//!   full column
//!
//! ## Architecture
//!
//! The XIRR solver and the ratio engine share no state. Both consume the
//! validated types from `perfcalc-core`; raw data goes through [`inputs`]
//! first.
//!
//! ## Usage
//!
//! ```rust
//! use perfcalc_analytics::prelude::*;
//! use perfcalc_core::types::{Date, TimeSeries};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let nav = TimeSeries::from_pairs(
//!     [100.0, 101.0, 99.0, 103.0, 104.0, 102.0]
//!         .iter()
//!         .enumerate()
//!         .map(|(i, &v)| (start.add_days(i as i64), v)),
//! )
//! .unwrap();
//!
//! let config = RatioConfig::default().with_risk_free_rate(0.04);
//! let engine = RatioEngine::new(nav, None, config).unwrap();
//!
//! let sharpe = engine.sharpe(4).unwrap();
//! let drawdown = engine.drawdown(4);
//! assert!(sharpe.tail().is_some());
//! assert!(drawdown.tail().unwrap() <= 0.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;

pub use error::{AnalyticsError, AnalyticsResult};

// ============================================================================
// MODULES
// ============================================================================

pub mod functions;
pub mod inputs;
pub mod ratios;
pub mod xirr;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::functions::{MetricOutput, MetricRequest};
    pub use crate::inputs::{CashFlowInput, NavInput};
    pub use crate::ratios::{
        BenchmarkSource, Metric, MetricSeries, RatioConfig, RatioEngine, ReturnsTable,
    };
    pub use crate::xirr::{xirr, XirrResult, XirrSolver};
}
