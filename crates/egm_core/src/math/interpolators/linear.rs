//! Piecewise linear interpolation in one dimension.

use super::Interpolator;
use crate::math::grid::Grid;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over a validated [`Grid`].
///
/// Queries outside the grid extrapolate linearly with the slope of the
/// boundary cell; they are never clamped to the boundary value. The EGM step
/// relies on this for off-grid decisions.
///
/// # Example
///
/// ```
/// use egm_core::math::grid::Grid;
/// use egm_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let grid = Grid::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
/// let interp = LinearInterpolator::new(grid, vec![0.0, 2.0, 3.0]).unwrap();
///
/// assert!((interp.interpolate(0.5).unwrap() - 1.0).abs() < 1e-12);
/// // Extrapolates with the last cell's slope
/// assert!((interp.interpolate(3.0).unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator<T: Float> {
    grid: Grid<T>,
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct from a grid and aligned values.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::ShapeMismatch)` - `ys.len() != grid.len()`
    pub fn new(grid: Grid<T>, ys: Vec<T>) -> Result<Self, InterpolationError> {
        if ys.len() != grid.len() {
            return Err(InterpolationError::ShapeMismatch {
                expected: grid.len(),
                got: ys.len(),
            });
        }
        Ok(Self { grid, ys })
    }

    /// Construct from unsorted `(x, y)` samples.
    ///
    /// Pairs are sorted by x. Repeated x values are rejected through grid
    /// validation (`GridError::NonMonotonic`).
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::interpolators::LinearInterpolator;
    ///
    /// let interp = LinearInterpolator::from_unsorted(&[2.0, 0.0, 1.0], &[4.0, 0.0, 1.0]).unwrap();
    /// assert_eq!(interp.xs(), &[0.0, 1.0, 2.0]);
    /// assert_eq!(interp.ys(), &[0.0, 1.0, 4.0]);
    /// ```
    pub fn from_unsorted(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::ShapeMismatch {
                expected: xs.len(),
                got: ys.len(),
            });
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (sorted_xs, sorted_ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

        Self::new(Grid::new(sorted_xs)?, sorted_ys)
    }

    /// Returns the underlying grid.
    #[inline]
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    /// Returns the sorted x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[T] {
        self.grid.points()
    }

    /// Returns the y-values in grid order.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.ys.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }

    /// Locate `x` and return `(cell, weight)`.
    ///
    /// The pair can be reused to evaluate other arrays aligned with the same
    /// grid via [`blend_at`](Self::blend_at).
    #[inline]
    pub fn cell(&self, x: T) -> Result<(usize, T), InterpolationError> {
        cell_weight(&self.grid, 0, 0, x)
    }

    /// Like [`cell`](Self::cell), starting the search from `hint`.
    #[inline]
    pub fn cell_from(&self, hint: usize, x: T) -> Result<(usize, T), InterpolationError> {
        cell_weight(&self.grid, 0, hint, x)
    }

    /// Blend this interpolator's values at a located cell.
    #[inline]
    pub fn value_at(&self, cell: usize, weight: T) -> T {
        lerp(self.ys[cell], self.ys[cell + 1], weight)
    }

    /// Blend an arbitrary array aligned with this grid at a located cell.
    ///
    /// # Panics
    ///
    /// Panics if `values` is shorter than `cell + 2`.
    #[inline]
    pub fn blend_at(values: &[T], cell: usize, weight: T) -> T {
        lerp(values[cell], values[cell + 1], weight)
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    /// Interpolate (or extrapolate) at `x`.
    ///
    /// ```text
    /// y = (1 - t) * y0 + t * y1,   t = (x - x0) / (x1 - x0)
    /// ```
    ///
    /// The blend is exact at the breakpoints.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (i, t) = self.cell(x)?;
        Ok(self.value_at(i, t))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        self.grid.domain()
    }
}

/// `(1 - t) * lo + t * hi`, exact for `t` in `{0, 1}`.
#[inline]
pub(crate) fn lerp<T: Float>(lo: T, hi: T, t: T) -> T {
    (T::one() - t) * lo + t * hi
}

/// Locate `x` in `grid` starting from `hint` and compute its cell weight.
///
/// `dimension` only labels errors.
#[inline]
pub(crate) fn cell_weight<T: Float>(
    grid: &Grid<T>,
    dimension: usize,
    hint: usize,
    x: T,
) -> Result<(usize, T), InterpolationError> {
    if !x.is_finite() {
        return Err(InterpolationError::NonFiniteQuery { dimension });
    }

    let i = grid.locate_from(hint, x);
    let width = grid.width(i);
    if !(width > T::zero()) || !width.is_finite() {
        return Err(InterpolationError::DegenerateCell {
            dimension,
            index: i,
        });
    }

    Ok((i, (x - grid.points()[i]) / width))
}
