//! Numerical kernels.
//!
//! - [`grid`]: strictly increasing breakpoint grids and grid builders
//! - [`interpolators`]: 1-D and D-dimensional multilinear interpolation
//! - [`solvers`]: golden-section search and Newton-Raphson
//! - [`envelope`]: upper envelope over EGM candidate segments
//! - [`markov`]: Tauchen and Rouwenhorst discretisation of AR(1) shocks
//! - [`quadrature`]: Gauss-Hermite rules for normal and log-normal shocks

pub mod envelope;
pub mod grid;
pub mod interpolators;
pub mod markov;
pub mod quadrature;
pub mod solvers;

use num_traits::Float;

/// Convert an `f64` constant into `T`.
///
/// Every `Float` implementor in practice represents these constants; a type
/// that cannot yields NaN, which then surfaces through the usual NaN checks.
#[inline]
pub(crate) fn lit<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
