//! Domain types for performance analytics.
//!
//! - [`Date`]: Calendar date
//! - [`CashFlow`] / [`CashFlowSeries`]: Dated signed amounts for XIRR
//! - [`TimeSeriesPoint`] / [`TimeSeries`]: Validated valuation series

mod cashflow;
mod date;
mod series;

pub use cashflow::{CashFlow, CashFlowSeries};
pub use date::Date;
pub use series::{TimeSeries, TimeSeriesPoint};
