//! Date-indexed valuation series.

use serde::{Deserialize, Serialize};

use super::Date;
use crate::error::{CoreError, CoreResult};

/// A single valuation (NAV) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation date
    pub date: Date,
    /// Valuation level
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Creates a new observation.
    #[must_use]
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<(Date, f64)> for TimeSeriesPoint {
    fn from((date, value): (Date, f64)) -> Self {
        Self::new(date, value)
    }
}

/// A date-ordered, date-unique valuation series.
///
/// Invariants, enforced by every constructor:
///
/// - dates are strictly increasing
/// - values are finite and non-negative
///
/// # Example
///
/// ```rust
/// use perfcalc_core::types::{Date, TimeSeries, TimeSeriesPoint};
///
/// let unsorted = vec![
///     TimeSeriesPoint::new(Date::from_ymd(2020, 2, 29).unwrap(), 101.0),
///     TimeSeriesPoint::new(Date::from_ymd(2020, 1, 31).unwrap(), 100.0),
/// ];
/// assert!(TimeSeries::new(unsorted.clone()).is_err());
///
/// let series = TimeSeries::from_unsorted(unsorted).unwrap();
/// assert_eq!(series.first().unwrap().value, 100.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Creates a series from points that are already in date order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` if dates are not strictly
    /// increasing or a value is negative or non-finite.
    pub fn new(points: Vec<TimeSeriesPoint>) -> CoreResult<Self> {
        for point in &points {
            if !point.value.is_finite() || point.value < 0.0 {
                return Err(CoreError::invalid_series(format!(
                    "value {} on {} must be finite and non-negative",
                    point.value, point.date
                )));
            }
        }

        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(CoreError::invalid_series(format!(
                "dates must be strictly increasing: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { points })
    }

    /// Creates a series from points in any order.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeries` on duplicate dates or invalid values.
    pub fn from_unsorted(mut points: Vec<TimeSeriesPoint>) -> CoreResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    /// Creates a series from `(date, value)` pairs in any order.
    pub fn from_pairs<I>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        Self::from_unsorted(pairs.into_iter().map(TimeSeriesPoint::from).collect())
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the observations.
    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Returns the first observation.
    #[must_use]
    pub fn first(&self) -> Option<&TimeSeriesPoint> {
        self.points.first()
    }

    /// Returns the most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Returns the observation dates.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Returns the valuation levels.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Looks up the value observed on `date`.
    #[must_use]
    pub fn value_on(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }
}

impl<'de> Deserialize<'de> for TimeSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<TimeSeriesPoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        TimeSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a TimeSeriesPoint;
    type IntoIter = std::slice::Iter<'a, TimeSeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
