//! # Perfcalc Core
//!
//! Core types for the Perfcalc investment performance library.
//!
//! This crate provides the canonical inputs every calculation consumes:
//!
//! - **Types**: [`Date`], [`CashFlow`], [`CashFlowSeries`], [`TimeSeries`]
//! - **Day Count Conventions**: ACT/365 Fixed year fractions
//!
//! ## Design Philosophy
//!
//! - **Validated at construction**: a [`TimeSeries`] is always date-ordered,
//!   date-unique and holds finite non-negative values
//! - **Explicit Over Implicit**: raw user data is converted into these types
//!   before any calculation runs
//!
//! ## Example
//!
//! ```rust
//! use perfcalc_core::prelude::*;
//!
//! let series = TimeSeries::new(vec![
//!     TimeSeriesPoint::new(Date::from_ymd(2024, 1, 31).unwrap(), 100.0),
//!     TimeSeriesPoint::new(Date::from_ymd(2024, 2, 29).unwrap(), 102.5),
//! ])
//! .unwrap();
//! assert_eq!(series.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{Act365Fixed, DayCount};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{CashFlow, CashFlowSeries, Date, TimeSeries, TimeSeriesPoint};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CashFlow, CashFlowSeries, Date, TimeSeries, TimeSeriesPoint};
