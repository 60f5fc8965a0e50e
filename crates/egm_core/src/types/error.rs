//! Structured error types for the grid, interpolation, solver, envelope and
//! shock-discretisation operations.
//!
//! Construction-time failures ([`GridError`], [`EnvelopeError`],
//! [`DiscretisationError`]) are raised
//! immediately. Evaluation-time failures ([`InterpolationError`]) are reported
//! per point and turned into NaN sentinels by the batch APIs. Solver failures
//! ([`SolverError`]) carry enough context for the caller to retry with a
//! different bracket or initial guess.

use thiserror::Error;

/// Grid construction errors.
///
/// A [`Grid`](crate::math::grid::Grid) is validated exactly once, when it is
/// built. Every variant here is raised at that point.
///
/// # Examples
/// ```
/// use egm_core::types::GridError;
///
/// let err = GridError::NonMonotonic { index: 3 };
/// assert!(format!("{}", err).contains("index 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Fewer breakpoints than a grid needs to define one cell.
    #[error("Insufficient grid points: got {got}, need at least {need}")]
    InsufficientPoints {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Adjacent breakpoints are equal or decreasing.
    #[error("Grid is not strictly increasing at index {index}")]
    NonMonotonic {
        /// Index of the first breakpoint not greater than its predecessor
        index: usize,
    },

    /// A breakpoint is NaN or infinite.
    #[error("Grid point at index {index} is not finite")]
    NonFinite {
        /// Index of the offending breakpoint
        index: usize,
    },

    /// Invalid parameters passed to a grid builder.
    #[error("Invalid grid parameter: {0}")]
    InvalidParameter(String),
}

/// Interpolation errors.
///
/// # Examples
/// ```
/// use egm_core::types::InterpolationError;
///
/// let err = InterpolationError::DegenerateCell { dimension: 0, index: 2 };
/// assert!(format!("{}", err).contains("zero width"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// The enclosing cell has zero (or non-finite) width.
    #[error("Cell {index} in dimension {dimension} has zero width")]
    DegenerateCell {
        /// Dimension in which the cell was located
        dimension: usize,
        /// Lower index of the cell
        index: usize,
    },

    /// Query point has the wrong number of coordinates.
    #[error("Dimension mismatch: expected {expected} coordinates, got {got}")]
    DimensionMismatch {
        /// Number of grid dimensions
        expected: usize,
        /// Number of coordinates supplied
        got: usize,
    },

    /// Value array or batch length does not match the grid shape.
    #[error("Shape mismatch: expected {expected} values, got {got}")]
    ShapeMismatch {
        /// Length implied by the grids
        expected: usize,
        /// Length supplied
        got: usize,
    },

    /// A query coordinate is NaN or infinite.
    #[error("Query coordinate in dimension {dimension} is not finite")]
    NonFiniteQuery {
        /// Dimension of the offending coordinate
        dimension: usize,
    },

    /// Grid validation failed while building an interpolator.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Scalar solver errors.
///
/// Golden-section search only fails on an unusable bracket; running out of
/// iterations is reported through [`ConvergenceWarning`] instead. Newton-Raphson
/// treats every failure as fatal because an unconverged Newton iterate can be
/// arbitrarily far from the root.
///
/// # Examples
/// ```
/// use egm_core::types::SolverError;
///
/// let err = SolverError::NonConvergence { iterations: 100, last: 0.5 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Derivative magnitude below the singularity threshold.
    #[error("Singular derivative f'({x}) = {derivative}")]
    SingularDerivative {
        /// Iterate at which the derivative vanished
        x: f64,
        /// Derivative value
        derivative: f64,
    },

    /// Iteration budget exhausted without meeting the tolerance.
    #[error("Failed to converge after {iterations} iterations (last iterate {last})")]
    NonConvergence {
        /// Number of iterations attempted
        iterations: usize,
        /// Final iterate
        last: f64,
    },

    /// Bracket endpoints are not finite.
    #[error("Invalid bracket [{a}, {b}]")]
    InvalidBracket {
        /// Left endpoint
        a: f64,
        /// Right endpoint
        b: f64,
    },

    /// Numerical instability during iteration.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Golden-section search ran out of iterations before meeting its tolerance.
///
/// This is a condition, not a failure: the accompanying result is still the
/// best point found and usable as an approximate optimum.
///
/// # Examples
/// ```
/// use egm_core::types::ConvergenceWarning;
///
/// let warning = ConvergenceWarning { iterations: 5, width: 0.25 };
/// assert!(format!("{}", warning).contains("0.25"));
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Search stopped after {iterations} iterations with bracket width {width}")]
pub struct ConvergenceWarning {
    /// Number of iterations performed
    pub iterations: usize,
    /// Width of the final bracket
    pub width: f64,
}

/// Upper-envelope input errors.
///
/// Raised before any output point is computed. Points that no candidate
/// covers are not errors; they are flagged in the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// No candidate segments were supplied.
    #[error("No candidate segments supplied")]
    NoCandidates,

    /// Grid, value, and policy arrays of a candidate differ in length.
    #[error(
        "Candidate {candidate}: grid ({grid}), values ({values}) and policy ({policy}) lengths differ"
    )]
    LengthMismatch {
        /// Candidate index
        candidate: usize,
        /// Grid length
        grid: usize,
        /// Value array length
        values: usize,
        /// Policy array length
        policy: usize,
    },

    /// A candidate has fewer than two points.
    #[error("Candidate {candidate}: insufficient data points (got {got}, need at least 2)")]
    InsufficientData {
        /// Candidate index
        candidate: usize,
        /// Number of points provided
        got: usize,
    },

    /// A candidate grid entry is NaN or infinite.
    #[error("Candidate {candidate}: grid point at index {index} is not finite")]
    NonFiniteGrid {
        /// Candidate index
        candidate: usize,
        /// Index of the offending entry
        index: usize,
    },

    /// EGM asset grid and endogenous grid differ in length.
    #[error("Asset grid ({assets}) and endogenous grid ({endogenous}) lengths differ")]
    AssetGridMismatch {
        /// Asset grid length
        assets: usize,
        /// Endogenous grid length
        endogenous: usize,
    },

    /// Building a sub-segment or output grid failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Shock discretisation errors.
///
/// Raised by the Markov-chain and quadrature builders.
///
/// # Examples
/// ```
/// use egm_core::types::DiscretisationError;
///
/// let err = DiscretisationError::NotStochastic { row: 2 };
/// assert!(format!("{}", err).contains("row 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscretisationError {
    /// Invalid process or rule parameters.
    #[error("Invalid discretisation parameter: {0}")]
    InvalidParameter(String),

    /// Transition matrix length is not `n * n`.
    #[error("Transition matrix must have {expected} entries, got {got}")]
    NotSquare {
        /// Required number of entries
        expected: usize,
        /// Number of entries supplied
        got: usize,
    },

    /// A transition row has a negative or non-finite entry, or does not sum to one.
    #[error("Transition matrix row {row} is not a probability distribution")]
    NotStochastic {
        /// Offending row
        row: usize,
    },

    /// The chain has more than one stationary distribution.
    #[error("Transition matrix has no unique ergodic distribution")]
    NoUniqueErgodic,

    /// Building the state grid failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Locating quadrature nodes failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}
