//! Golden-section search for unimodal minimisation.

use super::SolverConfig;
use crate::math::lit;
use crate::types::{ConvergenceWarning, SolverError};
use num_traits::Float;

/// Outcome of a golden-section search.
///
/// `converged == false` means the iteration budget ran out first. The point
/// is still the best one found and usable as an approximate optimum; see
/// [`warning`](Self::warning).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSectionResult<T: Float> {
    /// Best evaluated point.
    pub argmin: T,
    /// Objective value at `argmin`.
    pub fmin: T,
    /// Evaluations performed after the two initial probes.
    pub iterations: usize,
    /// Whether the bracket shrank below the tolerance.
    pub converged: bool,
    /// Final bracket `(lower, upper)`.
    pub bracket: (T, T),
}

impl<T: Float> GoldenSectionResult<T> {
    /// The non-fatal convergence condition, if the search hit its limit.
    pub fn warning(&self) -> Option<ConvergenceWarning> {
        if self.converged {
            return None;
        }
        Some(ConvergenceWarning {
            iterations: self.iterations,
            width: (self.bracket.1 - self.bracket.0).to_f64().unwrap_or(f64::NAN),
        })
    }
}

/// Derivative-free minimiser for unimodal functions on a bracket.
///
/// Keeps four points `lo < c < d < hi` with the interior probes at the golden
/// ratio `phi = (sqrt(5) - 1) / 2`:
///
/// ```text
/// c = lo + (1 - phi) * (hi - lo)
/// d = lo + phi * (hi - lo)
/// ```
///
/// Each iteration drops the outer segment beyond the worse probe. The
/// surviving probe lands exactly on one of the new probe positions, so only
/// one new function evaluation is needed per iteration.
///
/// # Caller obligation
///
/// The bracket must contain exactly one interior minimum. Unimodality is
/// not checked: on a multimodal objective the search silently returns one of
/// the local minima (or a boundary point), not necessarily the global one.
///
/// # Example
///
/// ```
/// use egm_core::math::solvers::{GoldenSectionSolver, SolverConfig};
///
/// let solver = GoldenSectionSolver::new(SolverConfig::new(1e-9, 200));
/// let result = solver.minimize(|x: f64| (x - 0.7).powi(2), 0.0, 2.0).unwrap();
///
/// assert!(result.converged);
/// assert!((result.argmin - 0.7).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct GoldenSectionSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> GoldenSectionSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Minimise `f` on the bracket `[a, b]`.
    ///
    /// Reversed bounds are swapped. A zero-width bracket returns its single
    /// point immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(result)` - Best point, with `converged` telling whether the
    ///   tolerance was met
    /// * `Err(SolverError::InvalidBracket)` - `a` or `b` is not finite
    pub fn minimize<F>(&self, f: F, a: T, b: T) -> Result<GoldenSectionResult<T>, SolverError>
    where
        F: Fn(T) -> T,
    {
        if !a.is_finite() || !b.is_finite() {
            return Err(SolverError::InvalidBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let inv_phi: T = (lit::<T>(5.0).sqrt() - T::one()) / lit(2.0);
        let inv_phi_sq = T::one() - inv_phi;

        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
        let mut c = lo + inv_phi_sq * (hi - lo);
        let mut d = lo + inv_phi * (hi - lo);
        let mut fc = f(c);
        let mut fd = f(d);

        let mut iterations = 0;
        let converged = loop {
            let mid = (lo + hi) / lit(2.0);
            if hi - lo <= self.config.threshold_at(mid) {
                break true;
            }
            if iterations >= self.config.max_iterations {
                break false;
            }

            if fc < fd {
                // Minimum lies in [lo, d]; c becomes the new upper probe.
                hi = d;
                d = c;
                fd = fc;
                c = lo + inv_phi_sq * (hi - lo);
                fc = f(c);
            } else {
                // Minimum lies in [c, hi]; d becomes the new lower probe.
                lo = c;
                c = d;
                fc = fd;
                d = lo + inv_phi * (hi - lo);
                fd = f(d);
            }
            iterations += 1;
        };

        let (argmin, fmin) = if fc < fd { (c, fc) } else { (d, fd) };
        let result = GoldenSectionResult {
            argmin,
            fmin,
            iterations,
            converged,
            bracket: (lo, hi),
        };

        if let Some(warning) = result.warning() {
            tracing::warn!(
                iterations = warning.iterations,
                width = warning.width,
                argmin = argmin.to_f64().unwrap_or(f64::NAN),
                "golden-section search hit its iteration limit"
            );
        }

        Ok(result)
    }
}

/// Minimise `f` on `[a, b]` with absolute tolerance `tol`.
///
/// Convenience wrapper around [`GoldenSectionSolver::minimize`]. A
/// non-positive `tol` never converges and runs the full `max_iter` budget.
///
/// # Example
///
/// ```
/// use egm_core::math::solvers::golden_section_search;
///
/// let r = golden_section_search(|x: f64| (x + 1.0).powi(2), -3.0, 3.0, 1e-8, 100).unwrap();
/// assert!(r.converged);
/// assert!((r.argmin + 1.0).abs() < 1e-7);
/// ```
pub fn golden_section_search<T, F>(
    f: F,
    a: T,
    b: T,
    tol: T,
    max_iter: usize,
) -> Result<GoldenSectionResult<T>, SolverError>
where
    T: Float,
    F: Fn(T) -> T,
{
    let config = SolverConfig {
        tolerance: tol,
        relative_tolerance: T::zero(),
        max_iterations: max_iter,
    };
    GoldenSectionSolver::new(config).minimize(f, a, b)
}
