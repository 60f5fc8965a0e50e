//! Piecewise-linear interpolation over rectangular grids.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: 1-D piecewise linear interpolation on a [`Grid`]
//! - [`MultilinearInterpolator`]: D-dimensional multilinear interpolation on a
//!   row-major value array
//! - [`interpolate`]: borrowed free-function form of the batch evaluator
//! - [`LocatedCell`]: one cell search shared by several value arrays on the
//!   same grids
//!
//! ## Extrapolation
//!
//! Both interpolators extrapolate linearly with the slope of the boundary
//! cell. The EGM step relies on this for decisions that land off the grid.
//! A query outside the grid in several dimensions at once composes the
//! per-dimension extrapolations.
//!
//! ## Batches
//!
//! Batch evaluation never aborts on a bad point: failures become NaN, and
//! only shape errors (a batch length that is not a multiple of D) are
//! returned as `Err`.
//!
//! ## Example
//!
//! ```
//! use egm_core::math::grid::Grid;
//! use egm_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let grid = Grid::new(vec![0.0_f64, 1.0, 2.0, 3.0]).unwrap();
//! let interp = LinearInterpolator::new(grid, vec![0.0, 1.0, 4.0, 9.0]).unwrap();
//!
//! let y = interp.interpolate(1.5).unwrap();
//! assert!((y - 2.5).abs() < 1e-10);
//! ```
//!
//! [`Grid`]: crate::math::grid::Grid

mod linear;
mod multilinear;
mod traits;

pub use linear::LinearInterpolator;
pub use multilinear::{interpolate, LocatedCell, MultilinearInterpolator};
pub use traits::Interpolator;

#[cfg(feature = "parallel")]
pub(crate) use multilinear::{evaluate_batch_raw, strides_for};
