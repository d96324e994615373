//! Derived return columns for a primary series and its benchmark.
//!
//! A [`ReturnsTable`] has one row per primary observation. Benchmark
//! columns are computed on the benchmark's own observation dates and then
//! left-joined onto the primary dates, so a benchmark date with no
//! primary counterpart is dropped and a primary date with no benchmark
//! counterpart has missing benchmark columns.

use perfcalc_core::daycounts::{Act365Fixed, DayCount};
use perfcalc_core::types::{Date, TimeSeries};
use serde::{Deserialize, Serialize};

/// Base level of a synthesized benchmark on the first primary date.
pub const SYNTHETIC_BASE_VALUE: f64 = 100.0;

/// Where a table's benchmark columns came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkSource {
    /// A benchmark series supplied by the caller.
    Supplied,
    /// Compounded from the risk-free rate.
    Synthetic,
}

/// Benchmark columns aligned to the primary dates.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkColumns {
    source: BenchmarkSource,
    values: Vec<Option<f64>>,
    returns: Vec<Option<f64>>,
    cumulative: Vec<Option<f64>>,
}

impl BenchmarkColumns {
    /// Left-joins a supplied benchmark onto `dates`.
    fn supplied(benchmark: &TimeSeries, dates: &[Date]) -> Self {
        let own_values: Vec<f64> = benchmark.values().collect();
        let own_returns = periodic_returns(&own_values);
        let own_cumulative = cumulative_returns(&own_returns);
        let points = benchmark.points();

        let mut values = Vec::with_capacity(dates.len());
        let mut returns = Vec::with_capacity(dates.len());
        let mut cumulative = Vec::with_capacity(dates.len());

        for date in dates {
            match points.binary_search_by_key(date, |p| p.date) {
                Ok(idx) => {
                    values.push(Some(own_values[idx]));
                    returns.push(own_returns[idx]);
                    cumulative.push(own_cumulative[idx]);
                }
                Err(_) => {
                    values.push(None);
                    returns.push(None);
                    cumulative.push(None);
                }
            }
        }

        Self {
            source: BenchmarkSource::Supplied,
            values,
            returns,
            cumulative,
        }
    }

    /// Compounds the risk-free rate daily from the first primary date.
    fn synthetic(risk_free_rate: f64, annualiser: f64, dates: &[Date]) -> Self {
        let values = synthetic_values(risk_free_rate, annualiser, dates);
        let returns = periodic_returns(&values);
        let cumulative = cumulative_returns(&returns);
        Self {
            source: BenchmarkSource::Synthetic,
            values: values.into_iter().map(Some).collect(),
            returns,
            cumulative,
        }
    }

    /// Returns where the columns came from.
    #[must_use]
    pub fn source(&self) -> BenchmarkSource {
        self.source
    }

    /// Benchmark levels on the primary dates.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Benchmark periodic returns on the primary dates.
    #[must_use]
    pub fn returns(&self) -> &[Option<f64>] {
        &self.returns
    }

    /// Benchmark cumulative returns on the primary dates.
    #[must_use]
    pub fn cumulative_returns(&self) -> &[Option<f64>] {
        &self.cumulative
    }
}

/// One row of a [`ReturnsTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnsRow {
    /// Observation date
    pub date: Date,
    /// Primary level
    pub value: f64,
    /// `value[t] / value[t-1] - 1`
    pub periodic_return: Option<f64>,
    /// Running sum of periodic returns
    pub cumulative_return: Option<f64>,
    /// Benchmark level
    pub benchmark_value: Option<f64>,
    /// Benchmark periodic return
    pub benchmark_return: Option<f64>,
    /// Benchmark running sum of returns
    pub benchmark_cumulative_return: Option<f64>,
}

/// Return columns derived from a primary series and an optional benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsTable {
    dates: Vec<Date>,
    values: Vec<f64>,
    returns: Vec<Option<f64>>,
    cumulative: Vec<Option<f64>>,
    benchmark: Option<BenchmarkColumns>,
}

impl ReturnsTable {
    /// Builds the primary columns only.
    #[must_use]
    pub fn new(primary: &TimeSeries) -> Self {
        let dates: Vec<Date> = primary.dates().collect();
        let values: Vec<f64> = primary.values().collect();
        let returns = periodic_returns(&values);
        let cumulative = cumulative_returns(&returns);
        Self {
            dates,
            values,
            returns,
            cumulative,
            benchmark: None,
        }
    }

    /// Adds benchmark columns joined from `benchmark`.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: &TimeSeries) -> Self {
        self.benchmark = Some(BenchmarkColumns::supplied(benchmark, &self.dates));
        self
    }

    /// Adds benchmark columns compounded from an annual risk-free rate.
    #[must_use]
    pub fn with_synthetic_benchmark(mut self, risk_free_rate: f64, annualiser: f64) -> Self {
        self.benchmark = Some(BenchmarkColumns::synthetic(
            risk_free_rate,
            annualiser,
            &self.dates,
        ));
        self
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Primary levels.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Primary periodic returns.
    #[must_use]
    pub fn returns(&self) -> &[Option<f64>] {
        &self.returns
    }

    /// Primary cumulative returns.
    #[must_use]
    pub fn cumulative_returns(&self) -> &[Option<f64>] {
        &self.cumulative
    }

    /// Benchmark columns, if any.
    #[must_use]
    pub fn benchmark(&self) -> Option<&BenchmarkColumns> {
        self.benchmark.as_ref()
    }

    /// Iterates over the table row by row.
    pub fn rows(&self) -> impl Iterator<Item = ReturnsRow> + '_ {
        (0..self.len()).map(move |i| {
            let bench = self.benchmark.as_ref();
            ReturnsRow {
                date: self.dates[i],
                value: self.values[i],
                periodic_return: self.returns[i],
                cumulative_return: self.cumulative[i],
                benchmark_value: bench.and_then(|b| b.values[i]),
                benchmark_return: bench.and_then(|b| b.returns[i]),
                benchmark_cumulative_return: bench.and_then(|b| b.cumulative[i]),
            }
        })
    }
}

/// Simple periodic returns. Row 0 and non-finite ratios are missing.
#[must_use]
pub fn periodic_returns(values: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(values.windows(2).map(|pair| {
            let r = pair[1] / pair[0] - 1.0;
            r.is_finite().then_some(r)
        }))
        .take(values.len())
        .collect()
}

/// Running sum of the present returns.
///
/// A row whose own return is missing stays missing; the running total
/// carries across it.
#[must_use]
pub fn cumulative_returns(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    returns
        .iter()
        .map(|r| {
            r.map(|r| {
                total += r;
                total
            })
        })
        .collect()
}

/// Levels of a benchmark growing at `risk_free_rate / annualiser` per day.
#[must_use]
pub fn synthetic_values(risk_free_rate: f64, annualiser: f64, dates: &[Date]) -> Vec<f64> {
    let Some(&start) = dates.first() else {
        return Vec::new();
    };
    let daily = 1.0 + risk_free_rate / annualiser;
    dates
        .iter()
        .map(|&date| {
            let days = Act365Fixed.day_count(start, date);
            SYNTHETIC_BASE_VALUE * daily.powf(days as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(data: &[((i32, u32, u32), f64)]) -> TimeSeries {
        TimeSeries::from_pairs(
            data.iter()
                .map(|&((y, m, d), v)| (Date::from_ymd(y, m, d).unwrap(), v)),
        )
        .unwrap()
    }

    #[test]
    fn test_periodic_and_cumulative() {
        let returns = periodic_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns[0], None);
        assert_relative_eq!(returns[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[2].unwrap(), -0.1, epsilon = 1e-12);

        let cumulative = cumulative_returns(&returns);
        assert_eq!(cumulative[0], None);
        assert_relative_eq!(cumulative[2].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_level_gives_missing_return() {
        let returns = periodic_returns(&[0.0, 1.0, 2.0]);
        assert_eq!(returns[1], None);
        assert_relative_eq!(returns[2].unwrap(), 1.0);
        assert!(periodic_returns(&[]).is_empty());
        assert_eq!(periodic_returns(&[5.0]), vec![None]);
    }

    #[test]
    fn test_cumulative_skips_missing() {
        let cumulative = cumulative_returns(&[None, Some(0.1), None, Some(0.2)]);
        assert_eq!(cumulative[2], None);
        assert_relative_eq!(cumulative[3].unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_left_join_benchmark() {
        let primary = series(&[
            ((2024, 1, 1), 100.0),
            ((2024, 1, 2), 101.0),
            ((2024, 1, 3), 102.0),
            ((2024, 1, 4), 103.0),
        ]);
        // No 2024-01-03 benchmark; an extra 2023 point that the join drops.
        let bench = series(&[
            ((2023, 12, 29), 40.0),
            ((2024, 1, 1), 50.0),
            ((2024, 1, 2), 55.0),
            ((2024, 1, 4), 44.0),
        ]);

        let table = ReturnsTable::new(&primary).with_benchmark(&bench);
        let b = table.benchmark().unwrap();

        assert_eq!(b.source(), BenchmarkSource::Supplied);
        assert_eq!(b.values(), &[Some(50.0), Some(55.0), None, Some(44.0)]);
        // Returns use the benchmark's own previous observation.
        assert_relative_eq!(b.returns()[0].unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(b.returns()[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(b.returns()[2], None);
        assert_relative_eq!(b.returns()[3].unwrap(), -0.2, epsilon = 1e-12);
        assert_relative_eq!(b.cumulative_returns()[3].unwrap(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_synthetic_benchmark_compounds_daily() {
        let primary = series(&[
            ((2024, 1, 1), 100.0),
            ((2024, 1, 2), 100.5),
            ((2024, 1, 5), 101.0),
        ]);
        let table = ReturnsTable::new(&primary).with_synthetic_benchmark(0.05, 250.0);
        let b = table.benchmark().unwrap();

        assert_eq!(b.source(), BenchmarkSource::Synthetic);
        let daily = 1.0 + 0.05 / 250.0;
        assert_relative_eq!(b.values()[0].unwrap(), 100.0);
        assert_relative_eq!(b.values()[1].unwrap(), 100.0 * daily, epsilon = 1e-12);
        assert_relative_eq!(b.values()[2].unwrap(), 100.0 * daily.powi(4), epsilon = 1e-12);
    }

    #[test]
    fn test_rows() {
        let primary = series(&[((2024, 1, 1), 100.0), ((2024, 1, 2), 110.0)]);
        let table = ReturnsTable::new(&primary);
        let rows: Vec<ReturnsRow> = table.rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].periodic_return, None);
        assert_relative_eq!(rows[1].cumulative_return.unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(rows[1].benchmark_value, None);
    }
}
