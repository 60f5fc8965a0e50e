//! # egm_core: Numerical Kernels for the Endogenous Grid Method
//!
//! Building blocks for solving consumption-savings models with EGM:
//! - Breakpoint grids and grid builders (`math::grid`)
//! - 1-D and D-dimensional multilinear interpolation with linear
//!   extrapolation (`math::interpolators`)
//! - Golden-section search and Newton-Raphson (`math::solvers`)
//! - Upper envelope over non-monotonic candidate segments (`math::envelope`)
//! - Shock discretisation: Markov chains for AR(1) processes (`math::markov`)
//!   and Gauss-Hermite quadrature (`math::quadrature`)
//! - Error types: `GridError`, `InterpolationError`, `SolverError`,
//!   `EnvelopeError`, `DiscretisationError`, `ConvergenceWarning`
//!   (`types::error`)
//!
//! All kernels are generic over `num_traits::Float` and are pure functions
//! of immutable inputs. The crate emits `tracing` events but never installs
//! a subscriber.
//!
//! ## Usage Examples
//!
//! ```rust
//! use egm_core::math::grid::Grid;
//! use egm_core::math::interpolators::interpolate;
//! use egm_core::math::solvers::golden_section_search;
//!
//! // Linear in both dimensions: f(x, y) = x + 2y
//! let gx = Grid::linspace(0.0, 1.0, 3).unwrap();
//! let gy = Grid::nonlinspace(0.0, 2.0, 4, 1.5).unwrap();
//! let values: Vec<f64> = gx
//!     .points()
//!     .iter()
//!     .flat_map(|&x| gy.points().iter().map(move |&y| x + 2.0 * y))
//!     .collect();
//! let z = interpolate(&[gx, gy], &values, &[0.25, 1.0]).unwrap();
//! assert!((z[0] - 2.25).abs() < 1e-12);
//!
//! // Unimodal minimisation on a bracket
//! let r = golden_section_search(|x: f64| (x - 0.3).powi(2), 0.0, 1.0, 1e-8, 100).unwrap();
//! assert!(r.converged);
//! # assert!((r.argmin - 0.3).abs() < 1e-7);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): rayon-backed batch variants in the `parallel` module

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod types;
