//! Newton-Raphson root-finding algorithm.

use crate::error::MathError;
use crate::solvers::{NewtonOutcome, SolverConfig, SolverResult};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// The run converges once `|x_{n+1} - x_n| <= tolerance` and
/// `|f(x_n)| <= residual_tolerance` hold together, and returns `x_{n+1}`.
/// A zero derivative, a non-finite function value, derivative or iterate,
/// or exhausting `max_iterations` ends the run with
/// [`NewtonOutcome::Failed`]. No partial result is returned.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use perfcalc_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let outcome = newton_raphson(f, df, 1.5, &SolverConfig::default());
/// assert!((outcome.root().unwrap() - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(f: F, df: DF, initial_guess: f64, config: &SolverConfig) -> NewtonOutcome
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if !fx.is_finite() {
            return fail(MathError::overflow("function evaluation"), initial_guess);
        }

        let dfx = df(x);
        if !dfx.is_finite() {
            return fail(MathError::overflow("derivative evaluation"), initial_guess);
        }
        if dfx == 0.0 {
            return fail(MathError::DivisionByZero { value: dfx }, initial_guess);
        }

        let next = x - fx / dfx;
        if !next.is_finite() {
            return fail(MathError::overflow("newton step"), initial_guess);
        }

        let step = (next - x).abs();
        x = next;

        if step <= config.tolerance && fx.abs() <= config.residual_tolerance {
            return NewtonOutcome::Converged(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: fx,
            });
        }
    }

    let residual = f(x).abs();
    fail(
        MathError::convergence_failed(config.max_iterations, residual),
        initial_guess,
    )
}

fn fail(err: MathError, initial_guess: f64) -> NewtonOutcome {
    log::trace!("newton-raphson from {initial_guess} failed: {err}");
    NewtonOutcome::Failed(err)
}
