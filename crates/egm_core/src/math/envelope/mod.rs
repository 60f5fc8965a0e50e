//! Upper envelope over EGM candidate segments.
//!
//! The endogenous grid method inverts the Euler equation on an asset grid,
//! which yields cash-on-hand points that need not be monotone. Where the
//! problem is non-concave, several candidate branches overlap and the true
//! policy is the one with the highest value at each point.
//!
//! - [`upper_envelope`] / [`upper_envelope_with`]: generic envelope over
//!   [`Candidate`] segments with values and a policy, sampled on an output
//!   [`Grid`](crate::math::grid::Grid)
//! - [`EgmEnvelope`]: the consumption-step variant, which values each
//!   re-sampled choice through a utility function and handles the
//!   credit-constrained region
//!
//! Output points no candidate reaches are reported, not rejected: NaN value
//! and policy, `source = None`.

mod candidate;
mod egm;
mod segments;
mod upper;

pub use candidate::{Candidate, Envelope, EnvelopeConfig, FoldPolicy};
pub use egm::{EgmEnvelope, EgmSolution};
pub use upper::{upper_envelope, upper_envelope_with};

#[cfg(feature = "parallel")]
pub(crate) use segments::EnvelopeSegments;
#[cfg(feature = "parallel")]
pub(crate) use upper::log_coverage;
