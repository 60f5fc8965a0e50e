//! Solver configuration types.

use crate::math::lit;
use num_traits::Float;

/// Configuration shared by the scalar solvers.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerances (e.g., `f64`)
///
/// # Tolerances
///
/// - Golden-section search stops once the bracket width is at most
///   `tolerance + relative_tolerance * |midpoint|`.
/// - Newton-Raphson stops once `|f(x)| < tolerance` or the step satisfies
///   `|dx| < tolerance + relative_tolerance * |x|`.
///
/// # Example
///
/// ```
/// use egm_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert_eq!(config.relative_tolerance, 0.0);
///
/// let custom = SolverConfig::new(1e-12, 200).with_relative_tolerance(1e-9);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Absolute convergence tolerance.
    pub tolerance: T,

    /// Relative convergence tolerance, scaled by the current iterate.
    pub relative_tolerance: T,

    /// Maximum number of iterations before giving up.
    ///
    /// Golden-section search counts function evaluations after the two
    /// initial probes; Newton-Raphson counts Newton steps.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `relative_tolerance`: 0
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            tolerance: lit(1e-10),
            relative_tolerance: T::zero(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a configuration with an absolute tolerance and iteration cap.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            relative_tolerance: T::zero(),
            max_iterations,
        }
    }

    /// Set the relative tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `relative_tolerance` is negative or not finite.
    pub fn with_relative_tolerance(mut self, relative_tolerance: T) -> Self {
        assert!(
            relative_tolerance >= T::zero() && relative_tolerance.is_finite(),
            "relative_tolerance must be finite and non-negative"
        );
        self.relative_tolerance = relative_tolerance;
        self
    }

    /// Tight tolerance (1e-14) and a generous budget (500).
    pub fn high_precision() -> Self {
        Self {
            tolerance: lit(1e-14),
            relative_tolerance: T::zero(),
            max_iterations: 500,
        }
    }

    /// Relaxed tolerance (1e-6) and a small budget (50).
    pub fn fast() -> Self {
        Self {
            tolerance: lit(1e-6),
            relative_tolerance: T::zero(),
            max_iterations: 50,
        }
    }

    /// Convergence threshold at scale `x`.
    #[inline]
    pub(crate) fn threshold_at(&self, x: T) -> T {
        self.tolerance + self.relative_tolerance * x.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 1e-10).abs() < 1e-15);
        assert_eq!(config.relative_tolerance, 0.0);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_new_config() {
        let config: SolverConfig<f64> = SolverConfig::new(1e-12, 200);
        assert!((config.tolerance - 1e-12).abs() < 1e-17);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }

    #[test]
    #[should_panic(expected = "relative_tolerance must be finite and non-negative")]
    fn test_negative_relative_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::default().with_relative_tolerance(-1.0);
    }

    #[test]
    fn test_presets() {
        let precise: SolverConfig<f64> = SolverConfig::high_precision();
        assert!(precise.tolerance < 1e-12);
        assert!(precise.max_iterations >= 500);

        let fast: SolverConfig<f64> = SolverConfig::fast();
        assert!(fast.tolerance > 1e-8);
        assert!(fast.max_iterations <= 50);
    }

    #[test]
    fn test_threshold_at() {
        let config = SolverConfig::new(1e-6, 10).with_relative_tolerance(1e-3);
        assert!((config.threshold_at(-10.0) - (1e-6 + 1e-2)).abs() < 1e-15);
    }

    #[test]
    fn test_config_with_f32() {
        let config: SolverConfig<f32> = SolverConfig::default();
        assert!(config.tolerance > 0.0);
    }
}
