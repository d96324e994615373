//! Metric output columns.

use perfcalc_core::types::Date;
use serde::{Deserialize, Serialize};

/// One row of a metric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Row date
    pub date: Date,
    /// Metric value, `None` where undefined
    pub value: Option<f64>,
}

/// A named metric column aligned to the rows of a returns table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    name: String,
    points: Vec<MetricPoint>,
}

impl MetricSeries {
    /// Zips a column of values with its row dates.
    ///
    /// Extra dates or values beyond the shorter side are dropped.
    #[must_use]
    pub fn new(name: impl Into<String>, dates: &[Date], values: Vec<Option<f64>>) -> Self {
        let points = dates
            .iter()
            .zip(values)
            .map(|(&date, value)| MetricPoint { date, value })
            .collect();
        Self {
            name: name.into(),
            points,
        }
    }

    /// Returns the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rows.
    #[must_use]
    pub fn points(&self) -> &[MetricPoint] {
        &self.points
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the value at row `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.points.get(index).and_then(|p| p.value)
    }

    /// Returns the value on the most recent row.
    ///
    /// `None` when the last row is undefined, even if earlier rows are not.
    #[must_use]
    pub fn tail(&self) -> Option<f64> {
        self.points.last().and_then(|p| p.value)
    }

    /// Returns the value on `date`.
    #[must_use]
    pub fn value_on(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|idx| self.points[idx].value)
    }

    /// Returns the column values.
    #[must_use]
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Iterates over the rows that have a value.
    pub fn defined(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<Date> {
        (1..=n).map(|d| Date::from_ymd(2024, 1, d).unwrap()).collect()
    }

    #[test]
    fn test_tail_is_last_row_only() {
        let series = MetricSeries::new("beta", &dates(3), vec![None, Some(1.2), None]);
        assert_eq!(series.tail(), None);
        assert_eq!(series.get(1), Some(1.2));
        assert_eq!(series.defined().count(), 1);
    }

    #[test]
    fn test_value_on() {
        let d = dates(3);
        let series = MetricSeries::new("drawdown", &d, vec![Some(0.0), Some(-0.1), Some(-0.05)]);
        assert_eq!(series.value_on(d[1]), Some(-0.1));
        assert_eq!(series.value_on(Date::from_ymd(2023, 1, 1).unwrap()), None);
        assert_eq!(series.tail(), Some(-0.05));
        assert_eq!(series.name(), "drawdown");
    }
}
