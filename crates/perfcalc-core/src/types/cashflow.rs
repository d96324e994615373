//! Dated cash flows for money-weighted return calculations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// A dated, signed cash flow amount.
///
/// Sign convention is the investor's choice, but a series must contain
/// both signs for a money-weighted return to exist.
///
/// # Example
///
/// ```rust
/// use perfcalc_core::types::{CashFlow, Date};
///
/// let cf = CashFlow::new(Date::from_ymd(2020, 3, 1).unwrap(), 10_000.0);
/// assert!(cf.is_inflow());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date
    pub date: Date,
    /// Signed amount
    pub amount: f64,
}

impl CashFlow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the signed amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns true for a strictly positive amount.
    #[must_use]
    pub fn is_inflow(&self) -> bool {
        self.amount > 0.0
    }

    /// Returns true for a strictly negative amount.
    #[must_use]
    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    /// Solving order: date ascending, then amount descending.
    #[must_use]
    pub fn solving_order(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| other.amount.total_cmp(&self.amount))
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.date, self.amount)
    }
}

impl From<(Date, f64)> for CashFlow {
    fn from((date, amount): (Date, f64)) -> Self {
        Self::new(date, amount)
    }
}

/// An unordered collection of cash flows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    cash_flows: Vec<CashFlow>,
}

impl CashFlowSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a series from cash flows, rejecting non-finite amounts.
    pub fn try_from_flows(cash_flows: Vec<CashFlow>) -> CoreResult<Self> {
        if let Some(bad) = cash_flows.iter().find(|cf| !cf.amount.is_finite()) {
            return Err(CoreError::invalid_cash_flow(format!(
                "non-finite amount on {}",
                bad.date
            )));
        }
        Ok(Self { cash_flows })
    }

    /// Adds a cash flow.
    pub fn push(&mut self, cf: CashFlow) {
        self.cash_flows.push(cf);
    }

    /// Returns the number of cash flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cash_flows.len()
    }

    /// Returns true if the series holds no cash flows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cash_flows.is_empty()
    }

    /// Returns the cash flows as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[CashFlow] {
        &self.cash_flows
    }

    /// Returns an iterator over the cash flows.
    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.cash_flows.iter()
    }

    /// Returns the sum of all amounts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cash_flows.iter().map(|cf| cf.amount).sum()
    }

    /// Returns true when at least one inflow and one outflow are present.
    #[must_use]
    pub fn has_mixed_signs(&self) -> bool {
        self.cash_flows.iter().any(CashFlow::is_inflow)
            && self.cash_flows.iter().any(CashFlow::is_outflow)
    }

    /// Returns a copy sorted by date ascending, then amount descending.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut cash_flows = self.cash_flows.clone();
        cash_flows.sort_by(CashFlow::solving_order);
        Self { cash_flows }
    }
}

impl IntoIterator for CashFlowSeries {
    type Item = CashFlow;
    type IntoIter = std::vec::IntoIter<CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.cash_flows.into_iter()
    }
}

impl<'a> IntoIterator for &'a CashFlowSeries {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.cash_flows.iter()
    }
}

impl FromIterator<CashFlow> for CashFlowSeries {
    fn from_iter<I: IntoIterator<Item = CashFlow>>(iter: I) -> Self {
        Self {
            cash_flows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_sign_checks() {
        let series: CashFlowSeries = [
            CashFlow::new(d(2020, 1, 1), 100.0),
            CashFlow::new(d(2020, 6, 1), 50.0),
        ]
        .into_iter()
        .collect();
        assert!(!series.has_mixed_signs());

        let mut series = series;
        series.push(CashFlow::new(d(2021, 1, 1), -160.0));
        assert!(series.has_mixed_signs());
        assert!((series.total() - -10.0).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_breaks_ties_by_amount_descending() {
        let series: CashFlowSeries = [
            CashFlow::new(d(2020, 6, 1), -500.0),
            CashFlow::new(d(2020, 1, 1), 100.0),
            CashFlow::new(d(2020, 6, 1), 500.0),
        ]
        .into_iter()
        .collect();

        let sorted = series.sorted();
        let amounts: Vec<f64> = sorted.iter().map(CashFlow::amount).collect();
        assert_eq!(amounts, vec![100.0, 500.0, -500.0]);
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = CashFlowSeries::try_from_flows(vec![CashFlow::new(d(2020, 1, 1), f64::NAN)]);
        assert!(matches!(result, Err(CoreError::InvalidCashFlow { .. })));
    }
}
