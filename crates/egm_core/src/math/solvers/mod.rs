//! Scalar optimisation and root-finding.
//!
//! ## Available Solvers
//!
//! - [`GoldenSectionSolver`]: derivative-free minimiser on a bracket.
//!   Hitting the iteration limit is not an error; the result carries a
//!   [`ConvergenceWarning`](crate::types::ConvergenceWarning).
//! - [`NewtonRaphsonSolver`]: root finder with explicit or numerical
//!   derivatives. Failures are fatal [`SolverError`](crate::types::SolverError)s.
//!
//! Both share [`SolverConfig`] for tolerances and iteration limits.
//!
//! ## Example
//!
//! ```
//! use egm_core::math::solvers::{GoldenSectionSolver, NewtonRaphsonSolver, SolverConfig};
//!
//! // Optimal consumption for ln(c) + ln(10 - c)
//! let objective = |c: f64| -(c.ln() + (10.0 - c).ln());
//! let golden = GoldenSectionSolver::new(SolverConfig::new(1e-10, 200));
//! let min = golden.minimize(objective, 0.1, 9.9).unwrap();
//!
//! // The same point from its first-order condition
//! let newton = NewtonRaphsonSolver::new(SolverConfig::default());
//! let root = newton
//!     .find_root(
//!         |c: f64| 1.0 / c - 1.0 / (10.0 - c),
//!         |c: f64| -1.0 / (c * c) - 1.0 / ((10.0 - c) * (10.0 - c)),
//!         3.0,
//!     )
//!     .unwrap();
//!
//! assert!((min.argmin - root.root).abs() < 1e-8);
//! ```

mod config;
mod golden_section;
mod newton_raphson;

pub use config::SolverConfig;
pub use golden_section::{golden_section_search, GoldenSectionResult, GoldenSectionSolver};
pub use newton_raphson::{newton_raphson, NewtonRaphsonSolver, RootResult};
