//! Common interface for 1-D interpolators.

use crate::types::InterpolationError;
use num_traits::Float;

/// A scalar function of one variable reconstructed from samples.
///
/// Implementors extrapolate beyond [`domain`](Interpolator::domain) rather
/// than failing, so `interpolate` only errors on NaN queries or degenerate
/// cells.
pub trait Interpolator<T: Float> {
    /// Evaluate at `x`.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Range spanned by the sample points, `(x_min, x_max)`.
    fn domain(&self) -> (T, T);
}
