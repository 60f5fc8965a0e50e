//! Upper envelope specialised to the EGM consumption step.

use crate::math::grid::Grid;
use crate::types::EnvelopeError;
use num_traits::Float;

/// Consumption and value-of-choice on a common cash-on-hand grid.
///
/// Points no segment reaches hold NaN in both arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct EgmSolution<T: Float> {
    /// Optimal consumption per grid point.
    pub consumption: Vec<T>,
    /// Value-of-choice per grid point.
    pub value: Vec<T>,
}

impl<T: Float> EgmSolution<T> {
    /// Number of grid points left uncovered.
    pub fn uncovered_count(&self) -> usize {
        self.value.iter().filter(|v| v.is_nan()).count()
    }
}

/// Upper envelope of an EGM step with a utility function.
///
/// The EGM step yields, for each end-of-period asset node `a_i`, an
/// endogenous cash-on-hand `m_i`, consumption `c_i` and post-decision value
/// `w_i`. With a non-concave problem `m` is not monotone in `a`. This
/// envelope re-samples every asset cell `[a_i, a_{i+1}]` onto a common
/// cash-on-hand grid and keeps the choice with the highest value:
///
/// - points with `m <= m_0` are credit constrained and consume everything,
///   valued at `u(m) + w_0`
/// - a cell with `a_i > a_{i+1}` is skipped
/// - a point inside `[m_i, m_{i+1}]` gets the guess
///   `c = c_i + slope * (m - m_i)`, implied assets `a = m - c`, and value
///   `u(c) + w(a)` with `w` interpolated linearly over the cell
/// - the last cell also extrapolates to points above `m_{N-1}`
///
/// Cells with `m_i == m_{i+1}` carry no slope and are skipped.
///
/// # Example
///
/// ```
/// use egm_core::math::envelope::EgmEnvelope;
/// use egm_core::math::grid::Grid;
///
/// let grid_a = [0.0, 0.5, 1.0];
/// let m = [1.0, 2.0, 3.0];
/// let c = [1.0, 1.5, 2.0];
/// let w = [0.0, 0.1, 0.2];
/// let grid_m = Grid::new(vec![0.5, 1.5, 2.5]).unwrap();
///
/// let solution = EgmEnvelope::new(|c: f64| c.ln())
///     .compute(&grid_a, &m, &c, &w, &grid_m)
///     .unwrap();
///
/// // Constrained below m[0]: consume all cash-on-hand
/// assert_eq!(solution.consumption[0], 0.5);
/// assert!((solution.consumption[2] - 1.75).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct EgmEnvelope<U> {
    utility: U,
    use_inverse_w: bool,
}

impl<U> EgmEnvelope<U> {
    /// Create an envelope for the utility function `utility`.
    ///
    /// Extra utility parameters are captured by the closure.
    pub fn new(utility: U) -> Self {
        Self {
            utility,
            use_inverse_w: false,
        }
    }

    /// Treat the `w` input as the negative inverse `-1 / w`.
    ///
    /// The negative inverse is close to linear for CRRA-type value functions,
    /// so interpolating it loses less accuracy.
    pub fn use_inverse_w(mut self, use_inverse_w: bool) -> Self {
        self.use_inverse_w = use_inverse_w;
        self
    }

    /// Compute consumption and value on `grid_m`.
    ///
    /// # Returns
    ///
    /// * `Err(EnvelopeError::AssetGridMismatch)` - `grid_a` and `m` differ in length
    /// * `Err(EnvelopeError::LengthMismatch)` - `m`, `w` and `c` differ in length
    /// * `Err(EnvelopeError::InsufficientData)` - fewer than 2 EGM points
    /// * `Err(EnvelopeError::NonFiniteGrid)` - NaN or infinite entry in `grid_a` or `m`
    pub fn compute<T>(
        &self,
        grid_a: &[T],
        m: &[T],
        c: &[T],
        w: &[T],
        grid_m: &Grid<T>,
    ) -> Result<EgmSolution<T>, EnvelopeError>
    where
        T: Float,
        U: Fn(T) -> T,
    {
        validate(grid_a, m, c, w)?;

        let xs = grid_m.points();
        let n = m.len();
        let mut solution = EgmSolution {
            consumption: vec![T::nan(); xs.len()],
            value: vec![T::nan(); xs.len()],
        };
        let post = |v: T| if self.use_inverse_w { -T::one() / v } else { v };

        let constrained = xs.partition_point(|&x| x <= m[0]);
        for (j, &x) in xs[..constrained].iter().enumerate() {
            solution.consumption[j] = x;
            solution.value[j] = (self.utility)(x) + post(w[0]);
        }

        for i in 0..n - 1 {
            let (a_lo, a_hi) = (grid_a[i], grid_a[i + 1]);
            let (m_lo, m_hi) = (m[i], m[i + 1]);
            if a_lo > a_hi || m_lo == m_hi {
                continue;
            }

            let w_slope = if a_hi > a_lo {
                (w[i + 1] - w[i]) / (a_hi - a_lo)
            } else {
                T::zero()
            };
            let c_slope = (c[i + 1] - c[i]) / (m_hi - m_lo);

            let inside = if m_lo < m_hi {
                xs.partition_point(|&x| x < m_lo)..xs.partition_point(|&x| x <= m_hi)
            } else {
                0..0
            };
            let above = if i == n - 2 {
                xs.partition_point(|&x| x <= m[n - 1])..xs.len()
            } else {
                0..0
            };

            for j in inside.chain(above) {
                let x = xs[j];
                let c_guess = c[i] + c_slope * (x - m_lo);
                let a_guess = x - c_guess;
                let w_guess = w[i] + w_slope * (a_guess - a_lo);
                let v = (self.utility)(c_guess) + post(w_guess);

                let best = solution.value[j];
                if !v.is_nan() && (best.is_nan() || v > best) {
                    solution.value[j] = v;
                    solution.consumption[j] = c_guess;
                }
            }
        }

        tracing::debug!(
            points = xs.len(),
            uncovered = solution.uncovered_count(),
            constrained,
            "egm envelope computed"
        );
        Ok(solution)
    }
}

fn validate<T: Float>(grid_a: &[T], m: &[T], c: &[T], w: &[T]) -> Result<(), EnvelopeError> {
    if grid_a.len() != m.len() {
        return Err(EnvelopeError::AssetGridMismatch {
            assets: grid_a.len(),
            endogenous: m.len(),
        });
    }
    if m.len() != w.len() || m.len() != c.len() {
        return Err(EnvelopeError::LengthMismatch {
            candidate: 0,
            grid: m.len(),
            values: w.len(),
            policy: c.len(),
        });
    }
    if m.len() < 2 {
        return Err(EnvelopeError::InsufficientData {
            candidate: 0,
            got: m.len(),
        });
    }
    let non_finite = |xs: &[T]| xs.iter().position(|x| !x.is_finite());
    if let Some(index) = non_finite(m).or_else(|| non_finite(grid_a)) {
        return Err(EnvelopeError::NonFiniteGrid {
            candidate: 0,
            index,
        });
    }
    Ok(())
}
