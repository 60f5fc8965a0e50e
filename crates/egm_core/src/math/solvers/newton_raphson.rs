//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::math::lit;
use crate::types::SolverError;
use num_traits::Float;

/// A converged Newton-Raphson root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult<T: Float> {
    /// The root estimate.
    pub root: T,
    /// `f(root)`.
    pub f_value: T,
    /// Newton steps taken.
    pub iterations: usize,
}

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)`. Converges
/// quadratically near a simple root. To find a stationary point of an
/// objective, pass its derivative as `f` and its second derivative as
/// `f_prime`.
///
/// # Failure is fatal
///
/// Unlike golden-section search, every failure here is an `Err`: an
/// unconverged Newton iterate can be arbitrarily far from the root.
///
/// - `|f'(x_n)|` below the derivative threshold (default `1e-14`) fails with
///   [`SolverError::SingularDerivative`]
/// - exhausting `max_iterations` fails with [`SolverError::NonConvergence`]
/// - a NaN or infinite iterate fails with [`SolverError::NumericalInstability`]
///
/// # Example
///
/// ```
/// use egm_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// let f = |x: f64| x * x - 2.0;
/// let f_prime = |x: f64| 2.0 * x;
///
/// let result = solver.find_root(f, f_prime, 1.0).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
    derivative_threshold: T,
    difference_step: T,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self {
            config,
            derivative_threshold: lit(1e-14),
            difference_step: lit(1e-6),
        }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Set the derivative magnitude below which a step is refused.
    pub fn with_derivative_threshold(mut self, threshold: T) -> Self {
        self.derivative_threshold = threshold.abs();
        self
    }

    /// Set the relative step of the numerical derivative used by
    /// [`find_root_numerical`](Self::find_root_numerical).
    pub fn with_difference_step(mut self, step: T) -> Self {
        self.difference_step = step.abs();
        self
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Returns the singular-derivative threshold.
    pub fn derivative_threshold(&self) -> T {
        self.derivative_threshold
    }

    /// Find a root of `f` using the explicit derivative `f_prime`.
    ///
    /// Stops when `|f(x_n)| < tolerance` or when a step is smaller than
    /// `tolerance + relative_tolerance * |x_{n+1}|`.
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
    /// use egm_core::types::SolverError;
    ///
    /// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
    ///
    /// // Starting on the zero of f'(x) = 2x is singular
    /// let result = solver.find_root(|x: f64| x * x - 4.0, |x: f64| 2.0 * x, 0.0);
    /// assert!(matches!(result, Err(SolverError::SingularDerivative { .. })));
    /// ```
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<RootResult<T>, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let mut x = x0;

        for iteration in 0..self.config.max_iterations {
            let f_val = f(x);
            if !f_val.is_finite() {
                return Err(self.fail(SolverError::NumericalInstability(format!(
                    "f({}) is not finite",
                    to_f64(x)
                ))));
            }

            if f_val.abs() < self.config.tolerance {
                return Ok(RootResult {
                    root: x,
                    f_value: f_val,
                    iterations: iteration,
                });
            }

            let f_prime_val = f_prime(x);
            if f_prime_val.is_nan() {
                return Err(self.fail(SolverError::NumericalInstability(format!(
                    "f'({}) is not a number",
                    to_f64(x)
                ))));
            }
            if f_prime_val.abs() < self.derivative_threshold {
                return Err(self.fail(SolverError::SingularDerivative {
                    x: to_f64(x),
                    derivative: to_f64(f_prime_val),
                }));
            }

            let step = f_val / f_prime_val;
            let next = x - step;
            if !next.is_finite() {
                return Err(self.fail(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                )));
            }

            if step.abs() < self.config.threshold_at(next) {
                return Ok(RootResult {
                    root: next,
                    f_value: f(next),
                    iterations: iteration + 1,
                });
            }

            x = next;
        }

        Err(self.fail(SolverError::NonConvergence {
            iterations: self.config.max_iterations,
            last: to_f64(x),
        }))
    }

    /// Find a root of `f` with a central-difference derivative.
    ///
    /// The difference step at `x` is `difference_step * max(|x|, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::solvers::NewtonRaphsonSolver;
    ///
    /// let solver: NewtonRaphsonSolver<f64> = NewtonRaphsonSolver::with_defaults();
    /// let result = solver.find_root_numerical(|x: f64| x.exp() - 3.0, 0.0).unwrap();
    /// assert!((result.root - 3.0_f64.ln()).abs() < 1e-9);
    /// ```
    pub fn find_root_numerical<F>(&self, f: F, x0: T) -> Result<RootResult<T>, SolverError>
    where
        F: Fn(T) -> T,
    {
        let step = self.difference_step;
        let two: T = lit(2.0);
        let f_prime = |x: T| {
            let h = step * x.abs().max(T::one());
            (f(x + h) - f(x - h)) / (two * h)
        };
        self.find_root(&f, f_prime, x0)
    }

    fn fail(&self, err: SolverError) -> SolverError {
        tracing::debug!(error = %err, "newton-raphson failed");
        err
    }
}

/// Find a root of `f` from `x0` with absolute tolerance `tol`.
///
/// Convenience wrapper around [`NewtonRaphsonSolver::find_root`].
pub fn newton_raphson<T, F, G>(
    f: F,
    f_prime: G,
    x0: T,
    tol: T,
    max_iter: usize,
) -> Result<RootResult<T>, SolverError>
where
    T: Float,
    F: Fn(T) -> T,
    G: Fn(T) -> T,
{
    let config = SolverConfig {
        tolerance: tol,
        relative_tolerance: T::zero(),
        max_iterations: max_iter,
    };
    NewtonRaphsonSolver::new(config).find_root(f, f_prime, x0)
}

#[inline]
fn to_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
