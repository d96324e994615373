//! Normalization of caller data into canonical series.
//!
//! Callers hold valuations and cash flows in different shapes: lists of
//! pairs, parallel columns, or delimited text. These adapters convert each
//! shape into a [`TimeSeries`] or [`CashFlowSeries`] before anything
//! reaches the XIRR solver or the ratio engine.

use std::io::Read;
use std::path::Path;

use perfcalc_core::types::{CashFlow, CashFlowSeries, Date, TimeSeries};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{AnalyticsError, AnalyticsResult};

// =============================================================================
// NAV INPUT
// =============================================================================

/// Valuation data in any supported shape.
#[derive(Debug, Clone, PartialEq)]
pub enum NavInput {
    /// `(date, nav)` pairs in any order.
    Pairs(Vec<(Date, f64)>),
    /// Parallel `date` and `nav` columns of equal length.
    Columns {
        /// Observation dates
        date: Vec<Date>,
        /// Valuation levels
        nav: Vec<f64>,
    },
    /// An already validated series.
    Series(TimeSeries),
}

impl NavInput {
    /// Converts the input into a validated, date-ordered series.
    pub fn into_series(self) -> AnalyticsResult<TimeSeries> {
        let pairs = match self {
            NavInput::Series(series) => return Ok(series),
            NavInput::Pairs(pairs) => pairs,
            NavInput::Columns { date, nav } => zip_columns("nav", date, nav)?,
        };
        Ok(TimeSeries::from_pairs(pairs)?)
    }
}

impl From<Vec<(Date, f64)>> for NavInput {
    fn from(pairs: Vec<(Date, f64)>) -> Self {
        NavInput::Pairs(pairs)
    }
}

impl From<TimeSeries> for NavInput {
    fn from(series: TimeSeries) -> Self {
        NavInput::Series(series)
    }
}

impl From<&TimeSeries> for NavInput {
    fn from(series: &TimeSeries) -> Self {
        NavInput::Series(series.clone())
    }
}

impl TryFrom<NavInput> for TimeSeries {
    type Error = AnalyticsError;

    fn try_from(input: NavInput) -> Result<Self, Self::Error> {
        input.into_series()
    }
}

// =============================================================================
// CASH FLOW INPUT
// =============================================================================

/// Cash-flow data in any supported shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CashFlowInput {
    /// `(date, amount)` pairs in any order.
    Pairs(Vec<(Date, f64)>),
    /// Parallel `date` and `amount` columns of equal length.
    Columns {
        /// Payment dates
        date: Vec<Date>,
        /// Signed amounts
        amount: Vec<f64>,
    },
    /// Already constructed cash flows.
    Flows(CashFlowSeries),
}

impl CashFlowInput {
    /// Converts the input into a cash-flow series with finite amounts.
    pub fn into_cash_flows(self) -> AnalyticsResult<CashFlowSeries> {
        let pairs: Vec<(Date, f64)> = match self {
            CashFlowInput::Flows(flows) => flows.into_iter().map(|cf| (cf.date, cf.amount)).collect(),
            CashFlowInput::Pairs(pairs) => pairs,
            CashFlowInput::Columns { date, amount } => zip_columns("amount", date, amount)?,
        };
        let flows = pairs.into_iter().map(CashFlow::from).collect();
        Ok(CashFlowSeries::try_from_flows(flows)?)
    }
}

impl From<Vec<(Date, f64)>> for CashFlowInput {
    fn from(pairs: Vec<(Date, f64)>) -> Self {
        CashFlowInput::Pairs(pairs)
    }
}

impl From<CashFlowSeries> for CashFlowInput {
    fn from(flows: CashFlowSeries) -> Self {
        CashFlowInput::Flows(flows)
    }
}

fn zip_columns(name: &str, dates: Vec<Date>, values: Vec<f64>) -> AnalyticsResult<Vec<(Date, f64)>> {
    if dates.len() != values.len() {
        return Err(AnalyticsError::invalid_input(format!(
            "column length mismatch: {} dates, {} {name} values",
            dates.len(),
            values.len()
        )));
    }
    Ok(dates.into_iter().zip(values).collect())
}

// =============================================================================
// CSV
// =============================================================================

/// CSV record for valuations.
#[derive(Debug, Deserialize)]
struct NavRecord {
    date: String,
    nav: f64,
}

/// CSV record for cash flows.
#[derive(Debug, Deserialize)]
struct CashFlowRecord {
    date: String,
    amount: f64,
}

/// Parses `date,nav` CSV (ISO dates, header row required).
pub fn parse_nav_csv<R: Read>(reader: R) -> AnalyticsResult<TimeSeries> {
    let pairs = read_records(reader, |r: NavRecord| (r.date, r.nav))?;
    NavInput::Pairs(pairs).into_series()
}

/// Parses `date,amount` CSV (ISO dates, header row required).
pub fn parse_cashflow_csv<R: Read>(reader: R) -> AnalyticsResult<CashFlowSeries> {
    let pairs = read_records(reader, |r: CashFlowRecord| (r.date, r.amount))?;
    CashFlowInput::Pairs(pairs).into_cash_flows()
}

/// Reads a `date,nav` CSV file.
pub fn read_nav_csv(path: impl AsRef<Path>) -> AnalyticsResult<TimeSeries> {
    parse_nav_csv(open(path.as_ref())?)
}

/// Reads a `date,amount` CSV file.
pub fn read_cashflow_csv(path: impl AsRef<Path>) -> AnalyticsResult<CashFlowSeries> {
    parse_cashflow_csv(open(path.as_ref())?)
}

fn open(path: &Path) -> AnalyticsResult<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        AnalyticsError::invalid_input(format!("cannot open {}: {e}", path.display()))
    })
}

fn read_records<R, T, F>(reader: R, split: F) -> AnalyticsResult<Vec<(Date, f64)>>
where
    R: Read,
    T: DeserializeOwned,
    F: Fn(T) -> (String, f64),
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for (row, result) in reader.deserialize::<T>().enumerate() {
        let record = result.map_err(|e| AnalyticsError::invalid_input(format!("csv: {e}")))?;
        let (date, value) = split(record);
        let date = Date::parse(&date).map_err(|e| {
            // Row numbers are 1-based and count the header.
            AnalyticsError::invalid_input(format!("row {}: {e}", row + 2))
        })?;
        pairs.push((date, value));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_pairs_are_sorted() {
        let input = NavInput::from(vec![(d(2024, 1, 3), 102.0), (d(2024, 1, 1), 100.0)]);
        let series = input.into_series().unwrap();
        assert_eq!(series.first().unwrap().date, d(2024, 1, 1));
    }

    #[test]
    fn test_column_length_mismatch() {
        let input = NavInput::Columns {
            date: vec![d(2024, 1, 1), d(2024, 1, 2)],
            nav: vec![100.0],
        };
        let err = input.into_series().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));

        let input = CashFlowInput::Columns {
            date: vec![d(2024, 1, 1)],
            amount: vec![],
        };
        assert!(matches!(
            input.into_cash_flows().unwrap_err(),
            AnalyticsError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_duplicate_dates_are_core_errors() {
        let input = NavInput::from(vec![(d(2024, 1, 1), 100.0), (d(2024, 1, 1), 101.0)]);
        assert!(matches!(input.into_series().unwrap_err(), AnalyticsError::Core(_)));
    }

    #[test]
    fn test_parse_nav_csv() {
        let text = "date,nav\n2024-01-02, 101.5\n2024-01-01,100\n";
        let series = parse_nav_csv(text.as_bytes()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.value_on(d(2024, 1, 2)), Some(101.5));
    }

    #[test]
    fn test_parse_cashflow_csv() {
        let text = "date,amount\n2020-01-01,-1000\n2021-01-01,1100\n";
        let flows = parse_cashflow_csv(text.as_bytes()).unwrap();

        assert_eq!(flows.len(), 2);
        assert!(flows.has_mixed_signs());
    }

    #[test]
    fn test_parse_csv_errors() {
        let bad_date = "date,nav\n2024-13-01,100\n";
        let err = parse_nav_csv(bad_date.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"));

        let bad_number = "date,amount\n2024-01-01,abc\n";
        assert!(parse_cashflow_csv(bad_number.as_bytes()).is_err());

        let wrong_header = "day,nav\n2024-01-01,100\n";
        assert!(parse_nav_csv(wrong_header.as_bytes()).is_err());
    }
}
