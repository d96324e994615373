//! Day count conventions.
//!
//! Money-weighted returns discount each cash flow by the year fraction
//! between its date and the first flow's date. Perfcalc uses
//! [`Act365Fixed`] for this, matching spreadsheet `XIRR`.
//!
//! # Usage
//!
//! ```rust
//! use perfcalc_core::daycounts::{Act365Fixed, DayCount};
//! use perfcalc_core::types::Date;
//!
//! let start = Date::from_ymd(2020, 1, 1).unwrap();
//! let end = Date::from_ymd(2021, 1, 1).unwrap();
//!
//! assert_eq!(Act365Fixed.day_count(start, end), 366);
//! assert!((Act365Fixed.year_fraction(start, end) - 366.0 / 365.0).abs() < 1e-15);
//! ```

mod act365;

pub use act365::Act365Fixed;

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;
}
