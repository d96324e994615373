//! Property-based tests for solver and engine invariants.
//!
//! These tests verify properties that should hold for any input:
//! - A returned XIRR zeroes the discounted cash flows within tolerance
//! - Single-signed cash flows never produce a rate
//! - Volatility is non-negative and drawdown non-positive
//! - Beta against the same series is one

use perfcalc_analytics::prelude::*;
use perfcalc_analytics::xirr::{xnpv, XIRR_RESIDUAL_TOLERANCE};
use perfcalc_core::types::{CashFlow, CashFlowSeries, Date, TimeSeries};
use proptest::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn start() -> Date {
    Date::from_ymd(2018, 1, 1).unwrap()
}

/// Cash flows on distinct-ish dates with amounts of either sign.
fn cash_flows() -> impl Strategy<Value = CashFlowSeries> {
    prop::collection::vec((0i64..2_000, -50_000.0f64..50_000.0), 2..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(offset, amount)| CashFlow::new(start().add_days(offset), amount))
            .collect()
    })
}

/// Daily NAV path built from bounded returns.
fn nav_series() -> impl Strategy<Value = TimeSeries> {
    prop::collection::vec(-0.05f64..0.05, 2..120).prop_map(|returns| {
        let mut level = 100.0;
        let mut pairs = vec![(start(), level)];
        for (i, r) in returns.into_iter().enumerate() {
            level *= 1.0 + r;
            pairs.push((start().add_days(i as i64 + 1), level));
        }
        TimeSeries::from_pairs(pairs).unwrap()
    })
}

proptest! {
    #[test]
    fn xirr_meets_residual_bound(flows in cash_flows()) {
        if let Some(result) = XirrSolver::new().solve_detailed(&flows, None) {
            prop_assert!(result.rate_pct.is_finite());
            prop_assert!(xnpv(&flows, result.rate).abs() <= XIRR_RESIDUAL_TOLERANCE);
        }
    }

    #[test]
    fn single_signed_flows_have_no_rate(
        amounts in prop::collection::vec(0.01f64..10_000.0, 1..10),
        negate in any::<bool>(),
    ) {
        let sign = if negate { -1.0 } else { 1.0 };
        let flows: Vec<CashFlow> = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| CashFlow::new(start().add_days(30 * i as i64), sign * a))
            .collect();
        prop_assert_eq!(xirr(&flows, None), None);
    }

    #[test]
    fn volatility_non_negative(nav in nav_series(), window in 2usize..30) {
        let engine = RatioEngine::new(nav, None, RatioConfig::default()).unwrap();
        let vol = engine.volatility(window);
        for (_, value) in vol.defined() {
            prop_assert!(value >= 0.0);
        }
        for row in 0..window.saturating_sub(1).min(vol.len()) {
            prop_assert!(vol.get(row).is_none());
        }
    }

    #[test]
    fn drawdown_non_positive(nav in nav_series(), window in 1usize..30) {
        let engine = RatioEngine::new(nav, None, RatioConfig::default()).unwrap();
        for (_, value) in engine.drawdown(window).defined() {
            prop_assert!(value <= 0.0);
        }
    }

    #[test]
    fn beta_against_self_is_one(nav in nav_series(), window in 3usize..30) {
        let engine = RatioEngine::new(nav.clone(), Some(nav), RatioConfig::default()).unwrap();
        for (_, value) in engine.beta(window).unwrap().defined() {
            prop_assert!((value - 1.0).abs() < 1e-9);
        }
    }
}
