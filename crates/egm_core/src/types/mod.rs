//! Error types shared across the kernels.
//!
//! # Re-exports
//!
//! - [`GridError`], [`InterpolationError`], [`SolverError`],
//!   [`ConvergenceWarning`], [`EnvelopeError`], [`DiscretisationError`]
//!   from `error`

pub mod error;

pub use error::{
    ConvergenceWarning, DiscretisationError, EnvelopeError, GridError, InterpolationError,
    SolverError,
};
