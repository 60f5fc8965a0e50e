//! Splitting candidates into monotone sub-segments.

use super::candidate::{Candidate, EnvelopeConfig, FoldPolicy};
use crate::math::grid::Grid;
use crate::math::interpolators::{Interpolator, LinearInterpolator};
use crate::types::EnvelopeError;
use num_traits::Float;

/// A maximal strictly monotone run `grid[start..=end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Run {
    pub start: usize,
    pub end: usize,
    pub increasing: bool,
}

/// Split `grid` into maximal strictly monotone runs.
///
/// Adjacent runs share their turning point. Equal consecutive entries end a
/// run without starting a zero-width cell.
pub(crate) fn monotone_runs<T: Float>(grid: &[T]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut direction: Option<bool> = None;

    for i in 1..grid.len() {
        let step = grid[i] - grid[i - 1];
        if step == T::zero() {
            if let Some(increasing) = direction {
                runs.push(Run {
                    start,
                    end: i - 1,
                    increasing,
                });
            }
            start = i;
            direction = None;
            continue;
        }

        let increasing = step > T::zero();
        match direction {
            None => direction = Some(increasing),
            Some(current) if current != increasing => {
                runs.push(Run {
                    start,
                    end: i - 1,
                    increasing: current,
                });
                start = i - 1;
                direction = Some(increasing);
            }
            Some(_) => {}
        }
    }

    if let Some(increasing) = direction {
        runs.push(Run {
            start,
            end: grid.len() - 1,
            increasing,
        });
    }
    runs
}

/// Increasing re-sampling of one kept run.
#[derive(Debug, Clone)]
pub(crate) struct SubSegment<T: Float> {
    candidate: usize,
    interp: LinearInterpolator<T>,
    policy: Vec<T>,
    extends_above: bool,
}

impl<T: Float> SubSegment<T> {
    /// Value and policy at `x`, or `None` when the sub-segment does not
    /// cover `x`. `hint` carries the cell search across calls.
    #[inline]
    fn sample(&self, x: T, hint: &mut usize) -> Option<(T, T)> {
        let (lo, hi) = self.interp.domain();
        let covered = (x >= lo && x <= hi) || (self.extends_above && x > hi);
        if !covered {
            return None;
        }
        let (i, t) = self.interp.cell_from(*hint, x).ok()?;
        *hint = i;
        Some((
            self.interp.value_at(i, t),
            LinearInterpolator::blend_at(&self.policy, i, t),
        ))
    }
}

/// Every kept sub-segment of every candidate, in candidate order.
#[derive(Debug, Clone)]
pub(crate) struct EnvelopeSegments<T: Float> {
    segments: Vec<SubSegment<T>>,
}

impl<T: Float> EnvelopeSegments<T> {
    /// Validate the candidates and split them into sub-segments.
    pub(crate) fn build(
        candidates: &[Candidate<T>],
        config: &EnvelopeConfig,
    ) -> Result<Self, EnvelopeError> {
        if candidates.is_empty() {
            return Err(EnvelopeError::NoCandidates);
        }

        let mut segments = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            validate(index, candidate)?;

            let runs = monotone_runs(candidate.grid());
            let has_increasing = runs.iter().any(|r| r.increasing);
            let keep = |run: &Run| match config.fold_policy {
                FoldPolicy::Retain => true,
                FoldPolicy::Discard => run.increasing || !has_increasing,
            };

            let first = segments.len();
            let mut discarded = 0;
            for run in &runs {
                if keep(run) {
                    segments.push(sub_segment(index, candidate, run)?);
                } else {
                    discarded += 1;
                }
            }

            if discarded > 0 {
                tracing::debug!(candidate = index, discarded, "discarded backward-bending folds");
            }

            if config.extrapolate_above {
                let mut top: Option<usize> = None;
                for k in first..segments.len() {
                    let upper = segments[k].interp.domain().1;
                    if top.map_or(true, |t| upper > segments[t].interp.domain().1) {
                        top = Some(k);
                    }
                }
                if let Some(k) = top {
                    segments[k].extends_above = true;
                }
            }
        }

        Ok(Self { segments })
    }

    /// Number of sub-segments across all candidates.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    /// Winning `(value, policy, candidate)` at `x`.
    ///
    /// A strictly greater value replaces the current winner, so ties keep
    /// the earlier candidate and, within one, the earlier sub-segment. NaN
    /// values never win. `hints` holds one cell hint per sub-segment.
    pub(crate) fn select(&self, x: T, hints: &mut [usize]) -> Option<(T, T, usize)> {
        let mut best: Option<(T, T, usize)> = None;
        for (segment, hint) in self.segments.iter().zip(hints.iter_mut()) {
            let Some((value, policy)) = segment.sample(x, hint) else {
                continue;
            };
            if value.is_nan() {
                continue;
            }
            match best {
                Some((top, _, _)) if !(value > top) => {}
                _ => best = Some((value, policy, segment.candidate)),
            }
        }
        best
    }

    /// Select at every point of `xs`, sharing cell hints along the slice.
    pub(crate) fn select_all(&self, xs: &[T]) -> Vec<Option<(T, T, usize)>> {
        let mut hints = vec![0; self.len()];
        xs.iter().map(|&x| self.select(x, &mut hints)).collect()
    }
}

fn validate<T: Float>(index: usize, candidate: &Candidate<T>) -> Result<(), EnvelopeError> {
    let (n, values, policy) = (
        candidate.len(),
        candidate.values().len(),
        candidate.policy().len(),
    );
    if n != values || n != policy {
        return Err(EnvelopeError::LengthMismatch {
            candidate: index,
            grid: n,
            values,
            policy,
        });
    }
    if n < 2 {
        return Err(EnvelopeError::InsufficientData {
            candidate: index,
            got: n,
        });
    }
    if let Some(i) = candidate.grid().iter().position(|x| !x.is_finite()) {
        return Err(EnvelopeError::NonFiniteGrid {
            candidate: index,
            index: i,
        });
    }
    Ok(())
}

fn sub_segment<T: Float>(
    index: usize,
    candidate: &Candidate<T>,
    run: &Run,
) -> Result<SubSegment<T>, EnvelopeError> {
    let range = run.start..=run.end;
    let mut xs = candidate.grid()[range.clone()].to_vec();
    let mut ys = candidate.values()[range.clone()].to_vec();
    let mut policy = candidate.policy()[range].to_vec();
    if !run.increasing {
        xs.reverse();
        ys.reverse();
        policy.reverse();
    }

    let n = xs.len();
    let interp = LinearInterpolator::new(Grid::new(xs)?, ys).map_err(|_| {
        EnvelopeError::LengthMismatch {
            candidate: index,
            grid: n,
            values: candidate.values().len(),
            policy: candidate.policy().len(),
        }
    })?;

    Ok(SubSegment {
        candidate: index,
        interp,
        policy,
        extends_above: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: usize, end: usize, increasing: bool) -> Run {
        Run {
            start,
            end,
            increasing,
        }
    }

    #[test]
    fn test_runs_monotone_increasing() {
        assert_eq!(monotone_runs(&[0.0, 1.0, 2.0]), vec![run(0, 2, true)]);
    }

    #[test]
    fn test_runs_share_turning_points() {
        let runs = monotone_runs(&[0.0, 2.0, 3.0, 1.5, 1.0, 4.0]);
        assert_eq!(
            runs,
            vec![run(0, 2, true), run(2, 4, false), run(4, 5, true)]
        );
    }

    #[test]
    fn test_runs_split_on_ties() {
        let runs = monotone_runs(&[0.0, 1.0, 1.0, 2.0]);
        assert_eq!(runs, vec![run(0, 1, true), run(2, 3, true)]);
    }

    #[test]
    fn test_runs_all_equal() {
        assert!(monotone_runs(&[1.0, 1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_discard_drops_fold() {
        let c = Candidate::new(
            vec![0.0, 2.0, 1.0, 3.0],
            vec![0.0, 2.0, 5.0, 3.0],
            vec![0.0; 4],
        );
        let segments = EnvelopeSegments::build(&[c], &EnvelopeConfig::default()).unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_retain_keeps_fold() {
        let c = Candidate::new(
            vec![0.0, 2.0, 1.0, 3.0],
            vec![-10.0, 2.0, 5.0, -10.0],
            vec![0.0; 4],
        );
        let config = EnvelopeConfig::default().with_fold_policy(FoldPolicy::Retain);
        let segments = EnvelopeSegments::build(&[c], &config).unwrap();
        assert_eq!(segments.len(), 3);
        // The fold [1, 2] carries the highest values there
        let mut hints = vec![0; 3];
        let (value, _, _) = segments.select(1.5, &mut hints).unwrap();
        assert!((value - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_decreasing_candidate_is_reversed() {
        let c = Candidate::new(vec![2.0, 1.0, 0.0], vec![4.0, 1.0, 0.0], vec![2.0, 1.0, 0.0]);
        let segments = EnvelopeSegments::build(&[c], &EnvelopeConfig::default()).unwrap();
        assert_eq!(segments.len(), 1);
        let mut hints = vec![0];
        let (value, policy, source) = segments.select(1.5, &mut hints).unwrap();
        assert!((value - 2.5).abs() < 1e-12);
        assert!((policy - 1.5).abs() < 1e-12);
        assert_eq!(source, 0);
    }

    #[test]
    fn test_extends_above_only_top_segment() {
        // Increasing runs [0, 2] and [1, 3] after discarding the fold [2, 1]
        let c = Candidate::new(
            vec![0.0, 2.0, 1.0, 3.0],
            vec![0.0, 2.0, 1.0, 3.0],
            vec![0.0, 2.0, 1.0, 3.0],
        );
        let config = EnvelopeConfig::default().with_extrapolate_above(true);
        let segments = EnvelopeSegments::build(&[c], &config).unwrap();
        let mut hints = vec![0; segments.len()];
        let (value, _, _) = segments.select(4.0, &mut hints).unwrap();
        assert!((value - 4.0).abs() < 1e-12);
        assert!(segments.select(-1.0, &mut hints).is_none());
    }

    #[test]
    fn test_validation_errors() {
        let config = EnvelopeConfig::default();
        assert_eq!(
            EnvelopeSegments::<f64>::build(&[], &config).unwrap_err(),
            EnvelopeError::NoCandidates
        );

        let short = Candidate::new(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0]);
        assert_eq!(
            EnvelopeSegments::build(&[short], &config).unwrap_err(),
            EnvelopeError::LengthMismatch {
                candidate: 0,
                grid: 2,
                values: 1,
                policy: 2
            }
        );

        let ok = Candidate::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]);
        let single = Candidate::new(vec![0.0], vec![0.0], vec![0.0]);
        assert_eq!(
            EnvelopeSegments::build(&[ok.clone(), single], &config).unwrap_err(),
            EnvelopeError::InsufficientData {
                candidate: 1,
                got: 1
            }
        );

        let nan = Candidate::new(vec![0.0, f64::NAN], vec![0.0, 1.0], vec![0.0, 1.0]);
        assert_eq!(
            EnvelopeSegments::build(&[ok, nan], &config).unwrap_err(),
            EnvelopeError::NonFiniteGrid {
                candidate: 1,
                index: 1
            }
        );
    }
}
