//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: quadratic convergence when the derivative is known
//!
//! A single Newton run either converges or fails; failure is an expected
//! outcome (a poor starting point, a flat region, an overflow) and is
//! returned as [`NewtonOutcome::Failed`] so that callers can move on to
//! another starting point.
//!
//! # Example: periodic IRR
//!
//! ```rust
//! use perfcalc_math::solvers::{newton_raphson, SolverConfig};
//!
//! // -100 today, 110 in one year
//! let npv = |r: f64| -100.0 + 110.0 / (1.0 + r);
//! let d_npv = |r: f64| -110.0 / (1.0 + r).powi(2);
//!
//! let outcome = newton_raphson(npv, d_npv, 0.05, &SolverConfig::default());
//! assert!((outcome.root().unwrap() - 0.10).abs() < 1e-9);
//! ```

mod newton;

pub use newton::newton_raphson;

use crate::error::{MathError, MathResult};

/// Default step tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default residual tolerance for root-finding algorithms.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
///
/// Convergence requires both the step and the residual to be within
/// their tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on the size of the last step.
    pub tolerance: f64,
    /// Tolerance on the absolute function value.
    pub residual_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, residual_tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            residual_tolerance,
            max_iterations,
        }
    }

    /// Sets the step tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the residual tolerance.
    #[must_use]
    pub fn with_residual_tolerance(mut self, residual_tolerance: f64) -> Self {
        self.residual_tolerance = residual_tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a converged root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the last evaluated point before the final step.
    pub residual: f64,
}

/// Outcome of one solver run from one starting point.
#[derive(Debug, Clone, PartialEq)]
pub enum NewtonOutcome {
    /// The iteration met both tolerances.
    Converged(SolverResult),
    /// The iteration diverged, hit a numeric fault, or ran out of steps.
    Failed(MathError),
}

impl NewtonOutcome {
    /// Returns true if the run converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// Returns the root if the run converged.
    #[must_use]
    pub fn root(&self) -> Option<f64> {
        match self {
            Self::Converged(result) => Some(result.root),
            Self::Failed(_) => None,
        }
    }

    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> MathResult<SolverResult> {
        match self {
            Self::Converged(result) => Ok(result),
            Self::Failed(err) => Err(err),
        }
    }
}
