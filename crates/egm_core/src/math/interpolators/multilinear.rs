//! Multilinear interpolation on D-dimensional rectangular grids.

use super::linear::cell_weight;
use crate::math::grid::Grid;
use crate::types::InterpolationError;
use num_traits::Float;

/// Multilinear interpolator for a scalar field on a rectangular grid.
///
/// Values are stored row-major: the last dimension varies fastest, so the
/// value at node `(i_0, ..., i_{D-1})` sits at
/// `sum_k i_k * stride_k` with `stride_{D-1} = 1`.
///
/// Each query locates its cell per dimension, then blends the `2^D` corner
/// values with the product of per-dimension weights. Coordinates outside a
/// grid use the boundary cell with a weight outside `[0, 1]`, which
/// extrapolates linearly. When several coordinates are out of range at once
/// the per-dimension extrapolations compose through the same product.
///
/// # Example
///
/// ```
/// use egm_core::math::grid::Grid;
/// use egm_core::math::interpolators::MultilinearInterpolator;
///
/// // f(x, y) = x + 10 y on a 2 x 3 grid
/// let gx = Grid::new(vec![0.0_f64, 1.0]).unwrap();
/// let gy = Grid::new(vec![0.0, 1.0, 2.0]).unwrap();
/// let values = vec![0.0, 10.0, 20.0, 1.0, 11.0, 21.0];
///
/// let interp = MultilinearInterpolator::new(vec![gx, gy], values).unwrap();
/// let z = interp.evaluate(&[0.5, 1.5]).unwrap();
/// assert!((z - 15.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultilinearInterpolator<T: Float> {
    grids: Vec<Grid<T>>,
    values: Vec<T>,
    strides: Vec<usize>,
}

impl<T: Float> MultilinearInterpolator<T> {
    /// Construct from one grid per dimension and a row-major value array.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::DimensionMismatch)` - No grids supplied
    /// * `Err(InterpolationError::ShapeMismatch)` - `values.len()` differs from
    ///   the product of grid sizes
    pub fn new(grids: Vec<Grid<T>>, values: Vec<T>) -> Result<Self, InterpolationError> {
        let strides = strides_for(&grids, values.len())?;
        Ok(Self {
            grids,
            values,
            strides,
        })
    }

    /// Number of dimensions D.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.grids.len()
    }

    /// Grid of each dimension.
    #[inline]
    pub fn grids(&self) -> &[Grid<T>] {
        &self.grids
    }

    /// Row-major value array.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Row-major strides, last dimension fastest.
    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of nodes per dimension.
    pub fn shape(&self) -> Vec<usize> {
        self.grids.iter().map(Grid::len).collect()
    }

    /// Evaluate at a single point of length D.
    pub fn evaluate(&self, point: &[T]) -> Result<T, InterpolationError> {
        let d = self.dimensions();
        let mut cells = vec![0; d];
        let mut weights = vec![T::zero(); d];
        evaluate_hinted(
            &self.grids,
            &self.values,
            &self.strides,
            point,
            &mut cells,
            &mut weights,
        )
    }

    /// Locate the cell of `point` once for reuse across value arrays.
    ///
    /// Any array laid out on the same grids can then be blended at the
    /// located cell with [`blend`](Self::blend) without repeating the search.
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::grid::Grid;
    /// use egm_core::math::interpolators::MultilinearInterpolator;
    ///
    /// let gx = Grid::new(vec![0.0, 1.0]).unwrap();
    /// let gy = Grid::new(vec![0.0_f64, 1.0, 2.0]).unwrap();
    /// let consumption = vec![0.0, 10.0, 20.0, 1.0, 11.0, 21.0];
    /// let value = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    /// let interp = MultilinearInterpolator::new(vec![gx, gy], consumption).unwrap();
    ///
    /// let cell = interp.locate(&[0.5, 1.5]).unwrap();
    /// assert!((interp.value_at(&cell) - 15.5).abs() < 1e-12);
    /// assert!((interp.blend(&cell, &value).unwrap() - 3.0).abs() < 1e-12);
    /// ```
    pub fn locate(&self, point: &[T]) -> Result<LocatedCell<T>, InterpolationError> {
        let d = self.dimensions();
        if point.len() != d {
            return Err(InterpolationError::DimensionMismatch {
                expected: d,
                got: point.len(),
            });
        }

        let mut cells = Vec::with_capacity(d);
        let mut weights = Vec::with_capacity(d);
        for (k, (grid, &x)) in self.grids.iter().zip(point).enumerate() {
            let (i, t) = cell_weight(grid, k, 0, x)?;
            cells.push(i);
            weights.push(t);
        }
        Ok(LocatedCell { cells, weights })
    }

    /// Blend this interpolator's own values at a located cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` was located by an interpolator on other grids.
    #[inline]
    pub fn value_at(&self, cell: &LocatedCell<T>) -> T {
        blend_corners(&self.values, &self.strides, &cell.cells, &cell.weights)
    }

    /// Blend another row-major array on the same grids at a located cell.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::ShapeMismatch)` - `values` does not match
    ///   the grid shape
    /// * `Err(InterpolationError::DimensionMismatch)` - `cell` was located on
    ///   grids of another dimension
    pub fn blend(&self, cell: &LocatedCell<T>, values: &[T]) -> Result<T, InterpolationError> {
        if values.len() != self.values.len() {
            return Err(InterpolationError::ShapeMismatch {
                expected: self.values.len(),
                got: values.len(),
            });
        }
        if cell.cells.len() != self.dimensions() {
            return Err(InterpolationError::DimensionMismatch {
                expected: self.dimensions(),
                got: cell.cells.len(),
            });
        }
        Ok(blend_corners(values, &self.strides, &cell.cells, &cell.weights))
    }

    /// Evaluate a flat row-major batch of `N x D` coordinates.
    ///
    /// Each point starts its cell search from the previous point's cells,
    /// which makes sorted batches close to linear time. Any order gives the
    /// same results.
    ///
    /// A point that fails (non-finite coordinate, degenerate cell) yields NaN; the
    /// rest of the batch is unaffected.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::ShapeMismatch)` - `points.len()` is not a
    ///   multiple of D
    pub fn evaluate_batch(&self, points: &[T]) -> Result<Vec<T>, InterpolationError> {
        evaluate_batch_raw(&self.grids, &self.values, &self.strides, points)
    }

    /// Like [`evaluate_batch`](Self::evaluate_batch), but keeps the error of
    /// each failed point.
    pub fn evaluate_batch_checked(
        &self,
        points: &[T],
    ) -> Result<Vec<Result<T, InterpolationError>>, InterpolationError> {
        let d = self.dimensions();
        check_batch_shape(d, points.len())?;

        let mut cells = vec![0; d];
        let mut weights = vec![T::zero(); d];
        Ok(points
            .chunks_exact(d)
            .map(|point| {
                evaluate_hinted(
                    &self.grids,
                    &self.values,
                    &self.strides,
                    point,
                    &mut cells,
                    &mut weights,
                )
            })
            .collect())
    }

    /// Evaluate with the first D-1 coordinates fixed and many last coordinates.
    ///
    /// The cells of the fixed prefix are located once. The last dimension
    /// uses the hinted search, which is fastest when `xs_last` is sorted.
    /// Failed points yield NaN, as in [`evaluate_batch`](Self::evaluate_batch).
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::DimensionMismatch)` - `prefix.len() != D - 1`
    /// * `Err(InterpolationError::NonFiniteQuery)` - NaN or infinity in `prefix`
    /// * `Err(InterpolationError::DegenerateCell)` - degenerate prefix cell
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::grid::Grid;
    /// use egm_core::math::interpolators::MultilinearInterpolator;
    ///
    /// let gx = Grid::new(vec![0.0, 1.0]).unwrap();
    /// let gy = Grid::new(vec![0.0, 1.0, 2.0]).unwrap();
    /// let values = vec![0.0, 10.0, 20.0, 1.0, 11.0, 21.0];
    /// let interp = MultilinearInterpolator::new(vec![gx, gy], values).unwrap();
    ///
    /// let zs = interp.evaluate_along_last(&[1.0], &[0.0, 0.5, 2.0]).unwrap();
    /// assert_eq!(zs, vec![1.0, 6.0, 21.0]);
    /// ```
    pub fn evaluate_along_last(
        &self,
        prefix: &[T],
        xs_last: &[T],
    ) -> Result<Vec<T>, InterpolationError> {
        let d = self.dimensions();
        if prefix.len() + 1 != d {
            return Err(InterpolationError::DimensionMismatch {
                expected: d,
                got: prefix.len() + 1,
            });
        }

        let mut cells = vec![0; d];
        let mut weights = vec![T::zero(); d];
        for (k, &x) in prefix.iter().enumerate() {
            let (i, t) = cell_weight(&self.grids[k], k, 0, x)?;
            cells[k] = i;
            weights[k] = t;
        }

        let last = d - 1;
        let grid = &self.grids[last];
        let mut out = Vec::with_capacity(xs_last.len());
        for &x in xs_last {
            match cell_weight(grid, last, cells[last], x) {
                Ok((i, t)) => {
                    cells[last] = i;
                    weights[last] = t;
                    out.push(blend_corners(&self.values, &self.strides, &cells, &weights));
                }
                Err(_) => out.push(T::nan()),
            }
        }
        Ok(out)
    }
}

/// Located cell of one query point: lower node index and weight per dimension.
///
/// Produced by [`MultilinearInterpolator::locate`]. Weights lie outside
/// `[0, 1]` for coordinates that extrapolate.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedCell<T: Float> {
    cells: Vec<usize>,
    weights: Vec<T>,
}

impl<T: Float> LocatedCell<T> {
    /// Lower node index in each dimension.
    #[inline]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Weight of the upper node in each dimension.
    #[inline]
    pub fn weights(&self) -> &[T] {
        &self.weights
    }
}

/// Interpolate a row-major value array on `grids` at a flat batch of points.
///
/// Free-function form of [`MultilinearInterpolator::evaluate_batch`] that
/// borrows its inputs instead of taking ownership.
///
/// # Example
///
/// ```
/// use egm_core::math::grid::Grid;
/// use egm_core::math::interpolators::interpolate;
///
/// let grids = [Grid::new(vec![0.0, 1.0, 2.0]).unwrap()];
/// let values = [0.0, 1.0, 4.0];
/// let ys = interpolate(&grids, &values, &[0.5, 1.5]).unwrap();
/// assert_eq!(ys, vec![0.5, 2.5]);
/// ```
pub fn interpolate<T: Float>(
    grids: &[Grid<T>],
    values: &[T],
    points: &[T],
) -> Result<Vec<T>, InterpolationError> {
    let strides = strides_for(grids, values.len())?;
    evaluate_batch_raw(grids, values, &strides, points)
}

/// Row-major strides after validating the value count against the grids.
pub(crate) fn strides_for<T: Float>(
    grids: &[Grid<T>],
    n_values: usize,
) -> Result<Vec<usize>, InterpolationError> {
    if grids.is_empty() {
        return Err(InterpolationError::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    }

    let mut strides = vec![1; grids.len()];
    let mut size: usize = 1;
    for (k, grid) in grids.iter().enumerate().rev() {
        strides[k] = size;
        size = size
            .checked_mul(grid.len())
            .ok_or(InterpolationError::ShapeMismatch {
                expected: usize::MAX,
                got: n_values,
            })?;
    }

    if size != n_values {
        return Err(InterpolationError::ShapeMismatch {
            expected: size,
            got: n_values,
        });
    }
    Ok(strides)
}

#[inline]
fn check_batch_shape(d: usize, len: usize) -> Result<(), InterpolationError> {
    if len % d != 0 {
        return Err(InterpolationError::ShapeMismatch {
            expected: (len / d + 1) * d,
            got: len,
        });
    }
    Ok(())
}

/// Sequential hinted batch evaluation with NaN sentinels.
pub(crate) fn evaluate_batch_raw<T: Float>(
    grids: &[Grid<T>],
    values: &[T],
    strides: &[usize],
    points: &[T],
) -> Result<Vec<T>, InterpolationError> {
    let d = grids.len();
    check_batch_shape(d, points.len())?;

    let mut cells = vec![0; d];
    let mut weights = vec![T::zero(); d];
    let out: Vec<T> = points
        .chunks_exact(d)
        .map(|point| {
            evaluate_hinted(grids, values, strides, point, &mut cells, &mut weights)
                .unwrap_or_else(|_| T::nan())
        })
        .collect();

    tracing::trace!(
        points = out.len(),
        dimensions = d,
        failed = out.iter().filter(|y| y.is_nan()).count(),
        "multilinear batch evaluated"
    );
    Ok(out)
}

/// Evaluate one point. `cells` holds the search hints on entry and the
/// located cells on exit.
#[inline]
fn evaluate_hinted<T: Float>(
    grids: &[Grid<T>],
    values: &[T],
    strides: &[usize],
    point: &[T],
    cells: &mut [usize],
    weights: &mut [T],
) -> Result<T, InterpolationError> {
    if point.len() != grids.len() {
        return Err(InterpolationError::DimensionMismatch {
            expected: grids.len(),
            got: point.len(),
        });
    }

    for (k, (grid, &x)) in grids.iter().zip(point).enumerate() {
        let (i, t) = cell_weight(grid, k, cells[k], x)?;
        cells[k] = i;
        weights[k] = t;
    }

    Ok(blend_corners(values, strides, cells, weights))
}

/// Weighted sum of the `2^D` corners of the located cell.
///
/// Bit `k` of `corner` selects the upper node in dimension `k`, weighted by
/// `t_k`; the lower node is weighted by `1 - t_k`.
#[inline]
fn blend_corners<T: Float>(values: &[T], strides: &[usize], cells: &[usize], weights: &[T]) -> T {
    let d = cells.len();
    let mut acc = T::zero();
    for corner in 0..(1usize << d) {
        let mut w = T::one();
        let mut offset = 0;
        for k in 0..d {
            if corner & (1 << k) != 0 {
                w = w * weights[k];
                offset += (cells[k] + 1) * strides[k];
            } else {
                w = w * (T::one() - weights[k]);
                offset += cells[k] * strides[k];
            }
        }
        acc = acc + w * values[offset];
    }
    acc
}
