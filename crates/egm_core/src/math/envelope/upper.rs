//! Upper envelope over candidate segments.

use super::candidate::{Candidate, Envelope, EnvelopeConfig};
use super::segments::EnvelopeSegments;
use crate::math::grid::Grid;
use crate::types::EnvelopeError;
use num_traits::Float;

/// Upper envelope of `candidates` on `output_grid` with default options.
///
/// See [`upper_envelope_with`].
///
/// # Example
///
/// ```
/// use egm_core::math::envelope::{upper_envelope, Candidate};
/// use egm_core::math::grid::Grid;
///
/// let a = Candidate::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 1.0]);
/// let b = Candidate::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 1.0], vec![0.0, 0.7, 0.9]);
/// let grid = Grid::new(vec![0.0, 0.5, 1.0, 1.5, 2.0]).unwrap();
///
/// let env = upper_envelope(&[a, b], &grid).unwrap();
/// assert_eq!(env.values, vec![0.0, 1.0, 2.0, 1.5, 2.0]);
/// assert_eq!(env.source, vec![Some(0), Some(1), Some(1), Some(0), Some(0)]);
/// ```
pub fn upper_envelope<T: Float>(
    candidates: &[Candidate<T>],
    output_grid: &Grid<T>,
) -> Result<Envelope<T>, EnvelopeError> {
    upper_envelope_with(candidates, output_grid, &EnvelopeConfig::default())
}

/// Upper envelope of `candidates` on `output_grid`.
///
/// Each candidate is split into strictly monotone runs; the kept runs are
/// re-sampled by linear interpolation inside their own domains. At every
/// output point the candidate with the strictly greatest value wins and
/// supplies its policy. Ties keep the earlier candidate.
///
/// Output points covered by no candidate get NaN value and policy and
/// `source = None`; they are not an error.
///
/// # Returns
///
/// * `Err(EnvelopeError::NoCandidates)` - `candidates` is empty
/// * `Err(EnvelopeError::LengthMismatch)` - A candidate's arrays differ in length
/// * `Err(EnvelopeError::InsufficientData)` - A candidate has fewer than 2 points
/// * `Err(EnvelopeError::NonFiniteGrid)` - A candidate grid entry is NaN or infinite
pub fn upper_envelope_with<T: Float>(
    candidates: &[Candidate<T>],
    output_grid: &Grid<T>,
    config: &EnvelopeConfig,
) -> Result<Envelope<T>, EnvelopeError> {
    let segments = EnvelopeSegments::build(candidates, config)?;
    let envelope = Envelope::from_selections(segments.select_all(output_grid.points()));
    log_coverage(&envelope, segments.len());
    Ok(envelope)
}

pub(crate) fn log_coverage<T: Float>(envelope: &Envelope<T>, segments: usize) {
    tracing::debug!(
        points = envelope.len(),
        segments,
        uncovered = envelope.uncovered_count(),
        "upper envelope computed"
    );
}
