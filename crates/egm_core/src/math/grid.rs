//! Strictly increasing breakpoint grids.

use super::lit;
use crate::types::GridError;
use num_traits::Float;

/// Ordered, strictly increasing sequence of breakpoints for one dimension.
///
/// Monotonicity is checked once, at construction. Cell lookup in the hot
/// interpolation loops relies on that invariant and never re-validates it.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`, `f32`)
///
/// # Example
///
/// ```
/// use egm_core::math::grid::Grid;
///
/// let grid = Grid::new(vec![0.0, 0.5, 2.0]).unwrap();
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid.locate(1.0), 1);
///
/// // Duplicates and decreasing entries are rejected
/// assert!(Grid::new(vec![0.0, 1.0, 1.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Float> {
    points: Vec<T>,
}

impl<T: Float> Grid<T> {
    /// Build a grid from breakpoints, validating the invariants.
    ///
    /// # Returns
    ///
    /// * `Err(GridError::InsufficientPoints)` - Fewer than 2 points
    /// * `Err(GridError::NonFinite)` - A NaN or infinite point
    /// * `Err(GridError::NonMonotonic)` - A point not greater than its predecessor
    pub fn new(points: Vec<T>) -> Result<Self, GridError> {
        if points.len() < 2 {
            return Err(GridError::InsufficientPoints {
                got: points.len(),
                need: 2,
            });
        }

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GridError::NonFinite { index });
        }

        if let Some(offset) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::NonMonotonic { index: offset + 1 });
        }

        Ok(Self { points })
    }

    /// Build a grid by copying a slice.
    pub fn from_slice(points: &[T]) -> Result<Self, GridError> {
        Self::new(points.to_vec())
    }

    /// Equally spaced grid on `[min, max]` with `n` points.
    ///
    /// The endpoints are exactly `min` and `max`.
    pub fn linspace(min: T, max: T, n: usize) -> Result<Self, GridError> {
        check_builder_args(min, max, n)?;

        let step = (max - min) / lit(n as f64 - 1.0);
        let mut points: Vec<T> = (0..n).map(|i| min + step * lit(i as f64)).collect();
        points[n - 1] = max;

        Self::new(points)
    }

    /// Unequally spaced grid on `[min, max]` with `n` points.
    ///
    /// `phi = 1` gives equal spacing; larger `phi` concentrates points near
    /// `min`, which suits asset grids where the value function has most
    /// curvature close to the borrowing limit.
    ///
    /// Recursion: `y[0] = min`, `y[i] = y[i-1] + (max - y[i-1]) / (n - i)^phi`.
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::grid::Grid;
    ///
    /// let grid = Grid::nonlinspace(0.0_f64, 10.0, 5, 1.5).unwrap();
    /// assert_eq!(grid.first(), 0.0);
    /// assert!((grid.last() - 10.0).abs() < 1e-12);
    /// // Spacing widens away from the lower end
    /// let p = grid.points();
    /// assert!(p[1] - p[0] < p[4] - p[3]);
    /// ```
    pub fn nonlinspace(min: T, max: T, n: usize, phi: T) -> Result<Self, GridError> {
        check_builder_args(min, max, n)?;
        if !(phi >= T::one()) || !phi.is_finite() {
            return Err(GridError::InvalidParameter(format!(
                "phi must be finite and >= 1, got {}",
                phi.to_f64().unwrap_or(f64::NAN)
            )));
        }

        let mut points = Vec::with_capacity(n);
        points.push(min);
        for i in 1..n {
            let prev = points[i - 1];
            let remaining: T = lit((n - i) as f64);
            points.push(prev + (max - prev) / remaining.powf(phi));
        }

        Self::new(points)
    }

    /// Grid on `[min, max]` that is close to equidistant in logs.
    ///
    /// Points are geometrically spaced after shifting by
    /// `pivot = |min| + 0.25`, so `min` may be zero or negative.
    pub fn equilogspace(min: T, max: T, n: usize) -> Result<Self, GridError> {
        check_builder_args(min, max, n)?;

        let pivot = min.abs() + lit(0.25);
        let lo = min + pivot;
        let hi = max + pivot;
        let ratio = hi / lo;
        let last: T = lit(n as f64 - 1.0);

        let mut points: Vec<T> = (0..n)
            .map(|i| lo * ratio.powf(lit::<T>(i as f64) / last) - pivot)
            .collect();
        points[0] = min;
        points[n - 1] = max;

        Self::new(points)
    }

    /// Returns the breakpoints.
    #[inline]
    pub fn points(&self) -> &[T] {
        &self.points
    }

    /// Returns the number of breakpoints (always at least 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of cells, `len() - 1`.
    #[inline]
    pub fn cells(&self) -> usize {
        self.points.len() - 1
    }

    /// Returns the smallest breakpoint.
    #[inline]
    pub fn first(&self) -> T {
        self.points[0]
    }

    /// Returns the largest breakpoint.
    #[inline]
    pub fn last(&self) -> T {
        self.points[self.points.len() - 1]
    }

    /// Returns `(first, last)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.first(), self.last())
    }

    /// Returns true if `x` lies in the closed domain `[first, last]`.
    #[inline]
    pub fn contains(&self, x: T) -> bool {
        x >= self.first() && x <= self.last()
    }

    /// Find the cell index `i` with `points[i] <= x < points[i+1]`.
    ///
    /// The result is clamped to `[0, len - 2]`, so points below the grid map
    /// to the first cell and points at or above the last breakpoint map to
    /// the last cell. O(log n).
    #[inline]
    pub fn locate(&self, x: T) -> usize {
        let pos = self.points.partition_point(|&p| p <= x);
        if pos == 0 {
            0
        } else {
            (pos - 1).min(self.points.len() - 2)
        }
    }

    /// Cell lookup starting from a previously found cell.
    ///
    /// Checks `hint` and the cell after it in constant time and falls back to
    /// [`locate`](Self::locate) otherwise. The result is always identical to
    /// `locate(x)`, whatever the hint.
    #[inline]
    pub fn locate_from(&self, hint: usize, x: T) -> usize {
        let last_cell = self.points.len() - 2;
        let h = hint.min(last_cell);

        if x >= self.points[h] {
            if h == last_cell || x < self.points[h + 1] {
                return h;
            }
            if h + 1 == last_cell || x < self.points[h + 2] {
                return h + 1;
            }
        } else if h == 0 && !x.is_nan() {
            return 0;
        }

        self.locate(x)
    }

    /// Local coordinate of `x` in cell `i`: 0 at `points[i]`, 1 at `points[i+1]`.
    ///
    /// Values outside `[0, 1]` mean `x` lies outside the cell, which is how
    /// boundary cells extrapolate.
    #[inline]
    pub fn weight(&self, i: usize, x: T) -> T {
        (x - self.points[i]) / (self.points[i + 1] - self.points[i])
    }

    /// Width of cell `i`.
    #[inline]
    pub fn width(&self, i: usize) -> T {
        self.points[i + 1] - self.points[i]
    }
}

impl<T: Float> TryFrom<Vec<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(points: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl<T: Float> AsRef<[T]> for Grid<T> {
    fn as_ref(&self) -> &[T] {
        &self.points
    }
}

fn check_builder_args<T: Float>(min: T, max: T, n: usize) -> Result<(), GridError> {
    if n < 2 {
        return Err(GridError::InsufficientPoints { got: n, need: 2 });
    }
    if !(max > min) || !min.is_finite() || !max.is_finite() {
        return Err(GridError::InvalidParameter(format!(
            "bounds must be finite with min < max, got [{}, {}]",
            min.to_f64().unwrap_or(f64::NAN),
            max.to_f64().unwrap_or(f64::NAN)
        )));
    }
    Ok(())
}
