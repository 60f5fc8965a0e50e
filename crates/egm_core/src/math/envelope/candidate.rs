//! Envelope inputs, options and results.

use num_traits::Float;

/// One candidate branch of an EGM step.
///
/// The endogenous grid may be non-monotonic. Lengths and finiteness are
/// validated when the candidate is passed to an envelope call, where the
/// candidate's position is known for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T: Float> {
    grid: Vec<T>,
    values: Vec<T>,
    policy: Vec<T>,
}

impl<T: Float> Candidate<T> {
    /// Create a candidate from its endogenous grid, values and policy.
    pub fn new(grid: Vec<T>, values: Vec<T>, policy: Vec<T>) -> Self {
        Self {
            grid,
            values,
            policy,
        }
    }

    /// Endogenous grid, in the order given.
    #[inline]
    pub fn grid(&self) -> &[T] {
        &self.grid
    }

    /// Values aligned with the grid.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Policy aligned with the grid.
    #[inline]
    pub fn policy(&self) -> &[T] {
        &self.policy
    }

    /// Number of grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// True when the candidate has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

/// Treatment of decreasing runs in an endogenous grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldPolicy {
    /// Drop decreasing runs (backward-bending folds). A candidate with no
    /// increasing run at all is reversed ordering and is kept.
    #[default]
    Discard,
    /// Keep every run and let the upper envelope arbitrate.
    Retain,
}

/// Options for [`upper_envelope_with`](super::upper_envelope_with).
///
/// # Example
///
/// ```
/// use egm_core::math::envelope::{EnvelopeConfig, FoldPolicy};
///
/// let config = EnvelopeConfig::default();
/// assert_eq!(config.fold_policy, FoldPolicy::Discard);
/// assert!(!config.extrapolate_above);
///
/// let config = EnvelopeConfig::default().with_extrapolate_above(true);
/// assert!(config.extrapolate_above);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvelopeConfig {
    /// Treatment of decreasing runs.
    pub fold_policy: FoldPolicy,
    /// Let each candidate's upper-most sub-segment cover output points above
    /// its domain by linear extrapolation.
    pub extrapolate_above: bool,
}

impl EnvelopeConfig {
    /// Set the fold policy.
    pub fn with_fold_policy(mut self, fold_policy: FoldPolicy) -> Self {
        self.fold_policy = fold_policy;
        self
    }

    /// Enable or disable extrapolation above each candidate's domain.
    pub fn with_extrapolate_above(mut self, extrapolate_above: bool) -> Self {
        self.extrapolate_above = extrapolate_above;
        self
    }
}

/// Upper envelope sampled on an output grid.
///
/// Uncovered output points hold NaN in both `values` and `policy` and
/// `None` in `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T: Float> {
    /// Envelope value per output point.
    pub values: Vec<T>,
    /// Policy of the winning candidate per output point.
    pub policy: Vec<T>,
    /// Index of the winning candidate per output point.
    pub source: Vec<Option<usize>>,
}

impl<T: Float> Envelope<T> {
    /// Assemble from per-point selections `(value, policy, candidate)`.
    pub(crate) fn from_selections<I>(selections: I) -> Self
    where
        I: IntoIterator<Item = Option<(T, T, usize)>>,
    {
        let selections = selections.into_iter();
        let (lower, _) = selections.size_hint();
        let mut envelope = Self {
            values: Vec::with_capacity(lower),
            policy: Vec::with_capacity(lower),
            source: Vec::with_capacity(lower),
        };
        for selection in selections {
            match selection {
                Some((value, policy, candidate)) => {
                    envelope.values.push(value);
                    envelope.policy.push(policy);
                    envelope.source.push(Some(candidate));
                }
                None => {
                    envelope.values.push(T::nan());
                    envelope.policy.push(T::nan());
                    envelope.source.push(None);
                }
            }
        }
        envelope
    }

    /// Number of output points.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the output grid was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether output point `j` is covered by some candidate.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.len()`.
    #[inline]
    pub fn is_covered(&self, j: usize) -> bool {
        self.source[j].is_some()
    }

    /// Number of output points no candidate covers.
    pub fn uncovered_count(&self) -> usize {
        self.source.iter().filter(|s| s.is_none()).count()
    }
}
