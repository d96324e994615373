//! Money-weighted rate of return (XIRR) for irregular cash flows.
//!
//! Finds the annual rate `r` that zeroes the date-discounted net present
//! value of a cash-flow series:
//!
//! $$\sum_i \frac{a_i}{(1 + r)^{d_i / 365}} = 0$$
//!
//! where `d_i` is the ACT day count from the earliest flow. Newton-Raphson
//! runs from a primary guess and, if that run fails, from a fixed ladder of
//! fallback guesses. The rate is reported as a percentage.
//!
//! # Example
//!
//! ```rust
//! use perfcalc_analytics::xirr::xirr;
//! use perfcalc_core::types::{CashFlow, Date};
//!
//! let flows = [
//!     CashFlow::new(Date::from_ymd(2010, 12, 29).unwrap(), -10_000.0),
//!     CashFlow::new(Date::from_ymd(2012, 1, 25).unwrap(), 20.0),
//!     CashFlow::new(Date::from_ymd(2012, 3, 8).unwrap(), 10_100.0),
//! ];
//!
//! let rate = xirr(&flows, None).unwrap();
//! assert!((rate - 1.0061265).abs() < 1e-6);
//! ```

use perfcalc_core::daycounts::{Act365Fixed, DayCount};
use perfcalc_core::types::{CashFlow, CashFlowSeries};
use perfcalc_math::solvers::{newton_raphson, NewtonOutcome, SolverConfig};
use perfcalc_math::MathError;
use serde::{Deserialize, Serialize};

/// Step tolerance on the rate between Newton iterations.
pub const XIRR_RATE_TOLERANCE: f64 = 1e-6;

/// Tolerance on the absolute discounted value of the flows.
pub const XIRR_RESIDUAL_TOLERANCE: f64 = 1e-4;

/// Newton iterations allowed per guess.
pub const XIRR_MAX_ITERATIONS: u32 = 100;

/// Magnitude of the default guess; negative when the flows sum positive.
pub const DEFAULT_GUESS_MAGNITUDE: f64 = 0.1;

/// Fallback guess magnitudes, in the order they are tried.
///
/// The order is strictly increasing on purpose, so 0.025 is tried before 0.05.
pub const FALLBACK_GUESS_MAGNITUDES: [f64; 9] = [0.025, 0.05, 0.15, 0.2, 0.25, 0.3, 0.5, 0.75, 0.9];

/// A converged XIRR with solver metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XirrResult {
    /// Annual rate as a percentage (rate × 100).
    pub rate_pct: f64,
    /// Annual rate as a fraction.
    pub rate: f64,
    /// Guess the successful run started from.
    pub guess: f64,
    /// Newton iterations used by the successful run.
    pub iterations: u32,
    /// Number of guesses tried, including the successful one.
    pub attempts: usize,
}

/// XIRR solver with a configurable Newton stopping rule.
///
/// Stateless apart from its configuration; safe to share and call
/// concurrently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XirrSolver {
    config: SolverConfig,
}

impl Default for XirrSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig::new(
                XIRR_RATE_TOLERANCE,
                XIRR_RESIDUAL_TOLERANCE,
                XIRR_MAX_ITERATIONS,
            ),
        }
    }
}

impl XirrSolver {
    /// Creates a solver with the standard tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the solver configuration.
    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for the annual rate, as a percentage.
    ///
    /// Returns `None` when the flows are all one sign or no guess converges.
    #[must_use]
    pub fn solve(&self, cash_flows: &CashFlowSeries, guess: Option<f64>) -> Option<f64> {
        self.solve_detailed(cash_flows, guess).map(|r| r.rate_pct)
    }

    /// Solves for the annual rate and reports how the solution was found.
    #[must_use]
    pub fn solve_detailed(
        &self,
        cash_flows: &CashFlowSeries,
        guess: Option<f64>,
    ) -> Option<XirrResult> {
        if !cash_flows.has_mixed_signs() {
            log::debug!("xirr skipped: cash flows need both an inflow and an outflow");
            return None;
        }

        let flows = DiscountedFlows::new(&cash_flows.sorted());
        let first_guess = guess.unwrap_or_else(|| default_guess(cash_flows.total()));

        for (attempt, start) in guess_ladder(first_guess).enumerate() {
            match self.run(&flows, start) {
                NewtonOutcome::Converged(result) => {
                    return Some(XirrResult {
                        rate_pct: result.root * 100.0,
                        rate: result.root,
                        guess: start,
                        iterations: result.iterations,
                        attempts: attempt + 1,
                    });
                }
                NewtonOutcome::Failed(err) => {
                    log::debug!("xirr guess {start} failed: {err}");
                }
            }
        }

        log::debug!("xirr did not converge from any guess");
        None
    }

    fn run(&self, flows: &DiscountedFlows, guess: f64) -> NewtonOutcome {
        let outcome = newton_raphson(
            |rate| flows.npv(rate),
            |rate| flows.npv_derivative(rate),
            guess,
            &self.config,
        );

        // The root is one step past the last checked point; hold it to the
        // residual bound as well.
        match outcome {
            NewtonOutcome::Converged(result) => {
                let residual = flows.npv(result.root).abs();
                if residual <= self.config.residual_tolerance {
                    NewtonOutcome::Converged(result)
                } else {
                    NewtonOutcome::Failed(MathError::convergence_failed(result.iterations, residual))
                }
            }
            failed @ NewtonOutcome::Failed(_) => failed,
        }
    }
}

/// Solves for the XIRR of `cash_flows` with the standard solver.
///
/// Returns the annual rate as a percentage, or `None`.
#[must_use]
pub fn xirr(cash_flows: &[CashFlow], guess: Option<f64>) -> Option<f64> {
    let series: CashFlowSeries = cash_flows.iter().copied().collect();
    XirrSolver::new().solve(&series, guess)
}

/// Discounted value of flows at `rate`, with day counts from the first flow.
///
/// This is the function whose root the solver seeks; it is public so
/// callers can verify a returned rate.
#[must_use]
pub fn xnpv(cash_flows: &CashFlowSeries, rate: f64) -> f64 {
    DiscountedFlows::new(&cash_flows.sorted()).npv(rate)
}

fn default_guess(total: f64) -> f64 {
    if total > 0.0 {
        -DEFAULT_GUESS_MAGNITUDE
    } else {
        DEFAULT_GUESS_MAGNITUDE
    }
}

/// First guess followed by the fallback ladder, signed like the first guess.
fn guess_ladder(first: f64) -> impl Iterator<Item = f64> {
    let sign = if first < 0.0 { -1.0 } else { 1.0 };
    std::iter::once(first).chain(
        FALLBACK_GUESS_MAGNITUDES
            .into_iter()
            .map(move |magnitude| sign * magnitude)
            .filter(move |&g| g != first),
    )
}

/// Flows reduced to (year fraction, amount) pairs.
struct DiscountedFlows {
    terms: Vec<(f64, f64)>,
}

impl DiscountedFlows {
    /// `sorted` must already be in solving order.
    fn new(sorted: &CashFlowSeries) -> Self {
        let terms = match sorted.as_slice().first() {
            Some(first) => sorted
                .iter()
                .map(|cf: &CashFlow| (Act365Fixed.year_fraction(first.date, cf.date), cf.amount))
                .collect(),
            None => Vec::new(),
        };
        Self { terms }
    }

    fn npv(&self, rate: f64) -> f64 {
        let r = 1.0 + rate;
        self.terms
            .iter()
            .map(|&(years, amount)| amount / r.powf(years))
            .sum()
    }

    fn npv_derivative(&self, rate: f64) -> f64 {
        let r = 1.0 + rate;
        self.terms
            .iter()
            .map(|&(years, amount)| -years * amount / r.powf(years + 1.0))
            .sum()
    }
}
