//! Rayon-based parallel variants of the batch kernels.
//!
//! Every kernel here is a pure function of immutable inputs, so work is
//! split into independent batches of output points (or brackets) and
//! results are written back in input order. Each variant returns exactly
//! what its sequential counterpart returns.
//!
//! Small inputs (below [`ParallelConfig::parallel_threshold`]) run
//! sequentially.

use crate::math::envelope::{log_coverage, Candidate, Envelope, EnvelopeConfig, EnvelopeSegments};
use crate::math::grid::Grid;
use crate::math::interpolators::{evaluate_batch_raw, strides_for, MultilinearInterpolator};
use crate::math::solvers::{GoldenSectionResult, GoldenSectionSolver};
use crate::types::{EnvelopeError, InterpolationError, SolverError};
use num_traits::Float;
use rayon::prelude::*;

/// Batch size for parallel processing.
///
/// Number of query points (or brackets) handed to one rayon task.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Configuration for parallel execution.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Items per rayon task
    pub batch_size: usize,
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: 256,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}

/// Parallel form of [`interpolate`](crate::math::interpolators::interpolate).
///
/// # Example
///
/// ```
/// use egm_core::math::grid::Grid;
/// use egm_core::parallel::{par_interpolate, ParallelConfig};
///
/// let grids = [Grid::linspace(0.0, 1.0, 11).unwrap()];
/// let values: Vec<f64> = grids[0].points().iter().map(|x| 2.0 * x).collect();
/// let points: Vec<f64> = (0..1000).map(|i| i as f64 / 999.0).collect();
///
/// let ys = par_interpolate(&grids, &values, &points, &ParallelConfig::default()).unwrap();
/// assert!((ys[999] - 2.0).abs() < 1e-12);
/// ```
pub fn par_interpolate<T>(
    grids: &[Grid<T>],
    values: &[T],
    points: &[T],
    config: &ParallelConfig,
) -> Result<Vec<T>, InterpolationError>
where
    T: Float + Send + Sync,
{
    let strides = strides_for(grids, values.len())?;
    par_evaluate_raw(grids, values, &strides, points, config)
}

impl<T: Float + Send + Sync> MultilinearInterpolator<T> {
    /// Parallel form of [`evaluate_batch`](Self::evaluate_batch).
    ///
    /// Cell hints are shared within a batch of
    /// [`ParallelConfig::batch_size`] points, not across batches.
    pub fn par_evaluate_batch(
        &self,
        points: &[T],
        config: &ParallelConfig,
    ) -> Result<Vec<T>, InterpolationError> {
        par_evaluate_raw(self.grids(), self.values(), self.strides(), points, config)
    }
}

fn par_evaluate_raw<T>(
    grids: &[Grid<T>],
    values: &[T],
    strides: &[usize],
    points: &[T],
    config: &ParallelConfig,
) -> Result<Vec<T>, InterpolationError>
where
    T: Float + Send + Sync,
{
    let d = grids.len();
    if points.len() % d != 0 || !config.should_parallelize(points.len() / d) {
        return evaluate_batch_raw(grids, values, strides, points);
    }

    let chunks: Vec<Vec<T>> = points
        .par_chunks(config.batch_size.max(1) * d)
        .map(|chunk| evaluate_batch_raw(grids, values, strides, chunk))
        .collect::<Result<_, _>>()?;
    Ok(chunks.into_iter().flatten().collect())
}

impl<T: Float + Send + Sync> GoldenSectionSolver<T> {
    /// Minimise many independent problems in parallel.
    ///
    /// `f(k, x)` is the objective of problem `k` on `brackets[k]`. Results
    /// come back in bracket order.
    ///
    /// # Example
    ///
    /// ```
    /// use egm_core::math::solvers::{GoldenSectionSolver, SolverConfig};
    ///
    /// let targets: Vec<f64> = (0..100).map(|k| k as f64 / 10.0).collect();
    /// let brackets = vec![(-1.0, 11.0); targets.len()];
    /// let solver = GoldenSectionSolver::new(SolverConfig::new(1e-9, 200));
    ///
    /// let results = solver.par_minimize_many(|k, x: f64| (x - targets[k]).powi(2), &brackets);
    /// let r = results[42].as_ref().unwrap();
    /// assert!((r.argmin - 4.2).abs() < 1e-8);
    /// ```
    pub fn par_minimize_many<F>(
        &self,
        f: F,
        brackets: &[(T, T)],
    ) -> Vec<Result<GoldenSectionResult<T>, SolverError>>
    where
        F: Fn(usize, T) -> T + Sync,
    {
        brackets
            .par_iter()
            .with_min_len(DEFAULT_BATCH_SIZE)
            .enumerate()
            .map(|(k, &(a, b))| self.minimize(|x| f(k, x), a, b))
            .collect()
    }
}

/// Parallel form of
/// [`upper_envelope_with`](crate::math::envelope::upper_envelope_with).
///
/// Candidates are split once; output points are then processed in batches.
pub fn par_upper_envelope_with<T>(
    candidates: &[Candidate<T>],
    output_grid: &Grid<T>,
    config: &EnvelopeConfig,
    parallel: &ParallelConfig,
) -> Result<Envelope<T>, EnvelopeError>
where
    T: Float + Send + Sync,
{
    let segments = EnvelopeSegments::build(candidates, config)?;
    let xs = output_grid.points();

    let selections: Vec<_> = if parallel.should_parallelize(xs.len()) {
        xs.par_chunks(parallel.batch_size.max(1))
            .flat_map_iter(|chunk| segments.select_all(chunk))
            .collect()
    } else {
        segments.select_all(xs)
    };

    let envelope = Envelope::from_selections(selections);
    log_coverage(&envelope, segments.len());
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::envelope::upper_envelope_with;
    use crate::math::solvers::SolverConfig;

    fn eager() -> ParallelConfig {
        ParallelConfig::new(7, 0)
    }

    #[test]
    fn test_config_defaults() {
        let config = ParallelConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!config.should_parallelize(10));
        assert!(config.should_parallelize(10_000));
        assert_eq!(ParallelConfig::new(0, 1).batch_size, 1);
    }

    #[test]
    fn test_par_evaluate_batch_matches_sequential() {
        let gx = Grid::linspace(0.0, 1.0, 5).unwrap();
        let gy = Grid::nonlinspace(0.0, 4.0, 9, 1.3).unwrap();
        let mut values = Vec::new();
        for &x in gx.points() {
            for &y in gy.points() {
                values.push((x * 3.0).sin() + y * y);
            }
        }
        let interp = MultilinearInterpolator::new(vec![gx, gy], values).unwrap();

        let mut points = Vec::new();
        for i in 0..500 {
            let s = i as f64 / 499.0;
            points.push(1.2 * s - 0.1);
            points.push(4.5 * (1.0 - s));
        }
        points[10] = f64::NAN;

        let seq = interp.evaluate_batch(&points).unwrap();
        let par = interp.par_evaluate_batch(&points, &eager()).unwrap();
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(&par) {
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }

    #[test]
    fn test_par_interpolate_shape_error() {
        let grids = [Grid::linspace(0.0, 1.0, 3).unwrap(), Grid::linspace(0.0, 1.0, 3).unwrap()];
        let values = vec![0.0; 9];
        assert!(matches!(
            par_interpolate(&grids, &values, &[0.0; 5], &eager()),
            Err(InterpolationError::ShapeMismatch { got: 5, .. })
        ));
    }

    #[test]
    fn test_par_minimize_many_preserves_order() {
        let solver = GoldenSectionSolver::new(SolverConfig::new(1e-10, 200));
        let brackets: Vec<(f64, f64)> = (0..200).map(|k| (k as f64 - 1.0, k as f64 + 2.0)).collect();
        let results = solver.par_minimize_many(|k, x: f64| (x - k as f64 - 0.5).powi(2), &brackets);
        for (k, r) in results.iter().enumerate() {
            let r = r.as_ref().unwrap();
            assert!(r.converged);
            assert!((r.argmin - (k as f64 + 0.5)).abs() < 1e-8);
        }
    }

    #[test]
    fn test_par_envelope_matches_sequential() {
        let a = Candidate::new(
            vec![0.0, 2.0, 1.0, 3.0],
            vec![0.0, 2.0, 1.5, 2.5],
            vec![0.0, 1.0, 2.0, 3.0],
        );
        let b = Candidate::new(vec![0.5, 2.5], vec![1.0, 1.8], vec![5.0, 6.0]);
        let out = Grid::linspace(-0.5, 3.5, 301).unwrap();
        let config = EnvelopeConfig::default();

        let seq = upper_envelope_with(&[a.clone(), b.clone()], &out, &config).unwrap();
        let par = par_upper_envelope_with(&[a, b], &out, &config, &eager()).unwrap();
        assert_eq!(seq.source, par.source);
        for j in 0..out.len() {
            assert!(seq.values[j] == par.values[j] || (seq.values[j].is_nan() && par.values[j].is_nan()));
        }
    }
}
