//! Finite Markov-chain approximations of AR(1) shock processes.
//!
//! The process `x' = mu + rho x + eps`, `eps ~ N(0, sigma^2)`, is replaced by
//! a chain on a fixed state grid:
//!
//! - [`tauchen`]: equally spaced states `m` unconditional standard deviations
//!   either side of the mean, with probabilities from the normal CDF
//! - [`rouwenhorst`]: binomial construction that matches the conditional mean
//!   and variance exactly, preferred for persistent processes
//! - [`log_rouwenhorst`]: Rouwenhorst in logs, rescaled to mean one
//!
//! The stationary distribution is found by [`find_ergodic`].
//!
//! # Example
//!
//! ```
//! use egm_core::math::markov::rouwenhorst;
//!
//! let chain = rouwenhorst(0.0, 0.9, 0.1, 5).unwrap();
//! for i in 0..chain.len() {
//!     let total: f64 = chain.row(i).iter().sum();
//!     assert!((total - 1.0).abs() < 1e-12);
//! }
//! ```

use super::grid::Grid;
use super::lit;
use crate::types::DiscretisationError;
use num_traits::Float;

/// Discrete state grid, row-major transition matrix and ergodic distribution.
///
/// `transition()[i * n + j]` is the probability of moving from state `i` to
/// state `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovChain<T: Float> {
    grid: Grid<T>,
    transition: Vec<T>,
    ergodic: Vec<T>,
}

impl<T: Float> MarkovChain<T> {
    /// Build a chain from states and a row-stochastic transition matrix.
    ///
    /// The ergodic distribution is solved for immediately.
    ///
    /// # Returns
    ///
    /// * `Err(DiscretisationError::NotSquare)` - `transition.len() != n * n`
    /// * `Err(DiscretisationError::NotStochastic)` - A row is not a distribution
    /// * `Err(DiscretisationError::NoUniqueErgodic)` - Reducible chain
    pub fn new(grid: Grid<T>, transition: Vec<T>) -> Result<Self, DiscretisationError> {
        let ergodic = find_ergodic(&transition, grid.len())?;
        Ok(Self {
            grid,
            transition,
            ergodic,
        })
    }

    /// Number of states.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Always false for a constructed chain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// State values.
    #[inline]
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    /// Row-major transition matrix.
    #[inline]
    pub fn transition(&self) -> &[T] {
        &self.transition
    }

    /// Transition probabilities out of state `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        let n = self.len();
        &self.transition[i * n..(i + 1) * n]
    }

    /// Probability of moving from state `i` to state `j`.
    #[inline]
    pub fn probability(&self, i: usize, j: usize) -> T {
        self.transition[i * self.len() + j]
    }

    /// Stationary distribution over the states.
    #[inline]
    pub fn ergodic(&self) -> &[T] {
        &self.ergodic
    }

    /// Cumulative sums along each transition row, for use with [`choice`].
    pub fn transition_cumsum(&self) -> Vec<T> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * n);
        for row in self.transition.chunks_exact(n) {
            out.extend(cumsum(row));
        }
        out
    }

    /// Cumulative sums of the ergodic distribution.
    pub fn ergodic_cumsum(&self) -> Vec<T> {
        cumsum(&self.ergodic)
    }

    /// Zero every transition probability below `cutoff`.
    ///
    /// The ergodic distribution is kept from the untruncated matrix, and
    /// rows are not renormalised.
    pub fn with_cutoff(mut self, cutoff: T) -> Self {
        for p in &mut self.transition {
            if *p < cutoff {
                *p = T::zero();
            }
        }
        self
    }

    /// Expected value of `values` next period, conditional on state `i`.
    ///
    /// # Panics
    ///
    /// Panics if `values` is shorter than `len()`.
    pub fn conditional_expectation(&self, i: usize, values: &[T]) -> T {
        self.row(i)
            .iter()
            .zip(values)
            .fold(T::zero(), |acc, (&p, &v)| acc + p * v)
    }
}

/// Tauchen discretisation of `x' = mu + rho x + eps`, `eps ~ N(0, sigma^2)`.
///
/// States are equally spaced over `mu / (1 - rho) +/- m * sigma_x`, where
/// `sigma_x` is the unconditional standard deviation. Each transition
/// probability is the normal mass of the half-step interval around the
/// target state; the end states absorb the tails.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - `n < 2`, `|rho| >= 1`,
///   `sigma <= 0`, `m <= 0`, or a non-finite argument
///
/// # Example
///
/// ```
/// use egm_core::math::markov::tauchen;
///
/// let chain = tauchen(0.0_f64, 0.5, 0.2, 3.0, 7).unwrap();
/// assert_eq!(chain.len(), 7);
/// assert!(chain.grid().points()[3].abs() < 1e-12);
/// ```
pub fn tauchen<T: Float>(
    mu: T,
    rho: T,
    sigma: T,
    m: T,
    n: usize,
) -> Result<MarkovChain<T>, DiscretisationError> {
    check_process(mu, rho, sigma, n)?;
    if !(m > T::zero()) || !m.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "width multiple m must be positive and finite".to_string(),
        ));
    }

    let center = mu / (T::one() - rho);
    let half_width = m * unconditional_std(rho, sigma);
    let grid = Grid::linspace(center - half_width, center + half_width, n)?;
    let points = grid.points();
    let half_step = (points[n - 1] - points[0]) / lit(2.0 * (n as f64 - 1.0));

    let mut transition = vec![T::zero(); n * n];
    for (j, row) in transition.chunks_exact_mut(n).enumerate() {
        let mean = mu + rho * points[j];
        let z = |x: T| (x - mean) / sigma;

        row[0] = norm_cdf(z(points[0] + half_step));
        row[n - 1] = norm_cdf(-z(points[n - 1] - half_step));
        for k in 1..n - 1 {
            row[k] = norm_cdf(z(points[k] + half_step)) - norm_cdf(z(points[k] - half_step));
        }
    }

    MarkovChain::new(grid, transition)
}

/// Rouwenhorst discretisation of `x' = mu + rho x + eps`, `eps ~ N(0, sigma^2)`.
///
/// States are equally spaced over `mu / (1 - rho) +/- sigma_x * sqrt(n - 1)`.
/// The transition matrix is built recursively from the two-state chain with
/// persistence `p = (1 + rho) / 2`; its ergodic distribution is
/// `Binomial(n - 1, 1/2)`.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - `n < 2`, `|rho| >= 1`,
///   `sigma <= 0`, or a non-finite argument
pub fn rouwenhorst<T: Float>(
    mu: T,
    rho: T,
    sigma: T,
    n: usize,
) -> Result<MarkovChain<T>, DiscretisationError> {
    check_process(mu, rho, sigma, n)?;

    let one = T::one();
    let p = (one + rho) / lit(2.0);
    let q = one - p;

    let mut transition = vec![p, q, q, p];
    for size in 3..=n {
        let prev = size - 1;
        let mut next = vec![T::zero(); size * size];
        for i in 0..prev {
            for j in 0..prev {
                let v = transition[i * prev + j];
                next[i * size + j] = next[i * size + j] + p * v;
                next[i * size + j + 1] = next[i * size + j + 1] + q * v;
                next[(i + 1) * size + j] = next[(i + 1) * size + j] + q * v;
                next[(i + 1) * size + j + 1] = next[(i + 1) * size + j + 1] + p * v;
            }
        }
        // Interior rows are counted twice by the overlapping blocks
        for v in &mut next[size..(size - 1) * size] {
            *v = *v / lit(2.0);
        }
        transition = next;
    }

    let center = mu / (one - rho);
    let half_width = unconditional_std(rho, sigma) * lit::<T>(n as f64 - 1.0).sqrt();
    let grid = Grid::linspace(center - half_width, center + half_width, n)?;

    MarkovChain::new(grid, transition)
}

/// Rouwenhorst discretisation of a log AR(1), exponentiated to levels.
///
/// The states are `exp(x_i)` scaled so that their ergodic mean is exactly
/// one. The transition matrix is that of [`rouwenhorst`] with `mu = 0`.
pub fn log_rouwenhorst<T: Float>(
    rho: T,
    sigma: T,
    n: usize,
) -> Result<MarkovChain<T>, DiscretisationError> {
    let chain = rouwenhorst(T::zero(), rho, sigma, n)?;

    let levels: Vec<T> = chain.grid.points().iter().map(|x| x.exp()).collect();
    let mean = levels
        .iter()
        .zip(&chain.ergodic)
        .fold(T::zero(), |acc, (&x, &p)| acc + p * x);
    let grid = Grid::new(levels.into_iter().map(|x| x / mean).collect())?;

    Ok(MarkovChain { grid, ..chain })
}

/// Stationary distribution `pi` of a row-stochastic `n x n` matrix.
///
/// Solves `pi P = pi` with `sum(pi) = 1` by replacing one balance equation
/// with the normalisation and eliminating with partial pivoting.
///
/// # Returns
///
/// * `Err(DiscretisationError::NotSquare)` - `transition.len() != n * n`
/// * `Err(DiscretisationError::NotStochastic)` - A row has a negative or
///   non-finite entry or does not sum to one
/// * `Err(DiscretisationError::NoUniqueErgodic)` - The balance equations are
///   singular (reducible chain)
///
/// # Example
///
/// ```
/// use egm_core::math::markov::find_ergodic;
///
/// let pi = find_ergodic(&[0.9_f64, 0.1, 0.5, 0.5], 2).unwrap();
/// assert!((pi[0] - 5.0 / 6.0).abs() < 1e-12);
/// ```
pub fn find_ergodic<T: Float>(transition: &[T], n: usize) -> Result<Vec<T>, DiscretisationError> {
    check_stochastic(transition, n)?;

    // Rows of the system are the balance equations (P^T - I) pi = 0
    let mut a = vec![T::zero(); n * n];
    for i in 0..n {
        for j in 0..n {
            a[i * n + j] = transition[j * n + i];
        }
        a[i * n + i] = a[i * n + i] - T::one();
    }
    for v in &mut a[(n - 1) * n..] {
        *v = T::one();
    }
    let mut b = vec![T::zero(); n];
    b[n - 1] = T::one();

    let threshold = T::epsilon() * lit(16.0 * n as f64);
    for col in 0..n {
        let pivot = (col..n).fold(col, |best, r| {
            if a[r * n + col].abs() > a[best * n + col].abs() {
                r
            } else {
                best
            }
        });
        if !(a[pivot * n + col].abs() > threshold) {
            return Err(DiscretisationError::NoUniqueErgodic);
        }
        if pivot != col {
            for c in 0..n {
                a.swap(pivot * n + c, col * n + c);
            }
            b.swap(pivot, col);
        }

        for r in col + 1..n {
            let factor = a[r * n + col] / a[col * n + col];
            if factor == T::zero() {
                continue;
            }
            for c in col..n {
                a[r * n + c] = a[r * n + c] - factor * a[col * n + c];
            }
            b[r] = b[r] - factor * b[col];
        }
    }

    let mut pi = vec![T::zero(); n];
    for row in (0..n).rev() {
        let acc = (row + 1..n).fold(b[row], |acc, c| acc - a[row * n + c] * pi[c]);
        pi[row] = acc / a[row * n + row];
    }

    // Rounding can leave tiny negative masses on near-absorbing states
    for p in &mut pi {
        *p = p.max(T::zero());
    }
    let total = pi.iter().fold(T::zero(), |acc, &p| acc + p);
    Ok(pi.into_iter().map(|p| p / total).collect())
}

/// Index selected by a uniform draw `u` from cumulative probabilities.
///
/// Returns the first `i` with `u <= cumsum[i]`, or the last index if `u`
/// exceeds every entry.
///
/// ```
/// use egm_core::math::markov::choice;
///
/// assert_eq!(choice(0.05, &[0.1, 0.6, 1.0]), 0);
/// assert_eq!(choice(0.7, &[0.1, 0.6, 1.0]), 2);
/// ```
pub fn choice<T: Float>(u: T, cumsum: &[T]) -> usize {
    let mut i = 0;
    while i + 1 < cumsum.len() && u > cumsum[i] {
        i += 1;
    }
    i
}

fn cumsum<T: Float>(values: &[T]) -> Vec<T> {
    values
        .iter()
        .scan(T::zero(), |acc, &v| {
            *acc = *acc + v;
            Some(*acc)
        })
        .collect()
}

#[inline]
fn unconditional_std<T: Float>(rho: T, sigma: T) -> T {
    (sigma * sigma / (T::one() - rho * rho)).sqrt()
}

fn check_process<T: Float>(mu: T, rho: T, sigma: T, n: usize) -> Result<(), DiscretisationError> {
    if n < 2 {
        return Err(DiscretisationError::InvalidParameter(format!(
            "need at least 2 states, got {n}"
        )));
    }
    if !mu.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "mean must be finite".to_string(),
        ));
    }
    if !(rho.abs() < T::one()) {
        return Err(DiscretisationError::InvalidParameter(
            "persistence must satisfy |rho| < 1".to_string(),
        ));
    }
    if !(sigma > T::zero()) || !sigma.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "shock standard deviation must be positive and finite".to_string(),
        ));
    }
    Ok(())
}

fn check_stochastic<T: Float>(transition: &[T], n: usize) -> Result<(), DiscretisationError> {
    if n == 0 || transition.len() != n * n {
        return Err(DiscretisationError::NotSquare {
            expected: n * n,
            got: transition.len(),
        });
    }

    let tolerance = (T::epsilon() * lit(16.0 * n as f64)).max(lit(1e-10));
    for (row, probabilities) in transition.chunks_exact(n).enumerate() {
        let valid = probabilities
            .iter()
            .all(|&p| p.is_finite() && p >= T::zero());
        let total = probabilities.iter().fold(T::zero(), |acc, &p| acc + p);
        if !valid || (total - T::one()).abs() > tolerance {
            return Err(DiscretisationError::NotStochastic { row });
        }
    }
    Ok(())
}

/// Standard normal CDF, `0.5 * erfc(-x / sqrt(2))`.
fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc(-x / lit(std::f64::consts::SQRT_2))
}

/// Complementary error function.
///
/// Below 2.5 it uses the non-alternating series
/// `erf(x) = 2/sqrt(pi) exp(-x^2) sum_k 2^k x^(2k+1) / (2k+1)!!`; above it
/// the Laplace continued fraction.
fn erfc<T: Float>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    if x < T::zero() {
        return lit::<T>(2.0) - erfc(-x);
    }

    let frac_2_sqrt_pi: T = lit(std::f64::consts::FRAC_2_SQRT_PI);
    let x2 = x * x;

    if x < lit(2.5) {
        let mut term = x;
        let mut sum = x;
        for k in 1..200 {
            term = term * lit::<T>(2.0) * x2 / lit(2.0 * k as f64 + 1.0);
            sum = sum + term;
            if term < T::epsilon() * sum {
                break;
            }
        }
        return T::one() - frac_2_sqrt_pi * (-x2).exp() * sum;
    }

    // erfc(x) = exp(-x^2) / sqrt(pi) / (x + (1/2) / (x + 1 / (x + (3/2) / (x + ...))))
    let mut tail = x;
    for k in (1..=60).rev() {
        tail = x + lit::<T>(k as f64 / 2.0) / tail;
    }
    frac_2_sqrt_pi / lit(2.0) * (-x2).exp() / tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_rows_sum_to_one(chain: &MarkovChain<f64>) {
        for i in 0..chain.len() {
            let total: f64 = chain.row(i).iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
            assert!(chain.row(i).iter().all(|&p| p >= 0.0));
        }
    }

    fn assert_fixed_point(chain: &MarkovChain<f64>) {
        let n = chain.len();
        let pi = chain.ergodic();
        assert_relative_eq!(pi.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for j in 0..n {
            let next: f64 = (0..n).map(|i| pi[i] * chain.probability(i, j)).sum();
            assert_relative_eq!(next, pi[j], epsilon = 1e-12);
        }
    }

    // ========================================
    // Normal CDF
    // ========================================

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
        assert_relative_eq!(norm_cdf(1.0_f64), 0.841_344_746_068_542_9, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-1.96_f64), 0.024_997_895_148_220_43, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-5.0_f64), 2.866_515_718_791_939e-7, max_relative = 1e-10);
        assert_relative_eq!(norm_cdf(4.0_f64), 0.999_968_328_758_166_9, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_cdf_symmetry_across_branch() {
        for &x in &[0.3, 2.0, 3.5, 3.6, 6.0] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    // ========================================
    // Tauchen
    // ========================================

    #[test]
    fn test_tauchen_grid_and_rows() {
        let (mu, rho, sigma) = (0.1, 0.6, 0.2);
        let chain = tauchen(mu, rho, sigma, 3.0, 9).unwrap();
        let sd = (sigma * sigma / (1.0 - rho * rho)).sqrt();
        let center = mu / (1.0 - rho);

        assert_eq!(chain.len(), 9);
        assert_relative_eq!(chain.grid().first(), center - 3.0 * sd, epsilon = 1e-12);
        assert_relative_eq!(chain.grid().last(), center + 3.0 * sd, epsilon = 1e-12);
        assert_relative_eq!(chain.grid().points()[4], center, epsilon = 1e-12);
        assert_rows_sum_to_one(&chain);
        assert_fixed_point(&chain);
    }

    #[test]
    fn test_tauchen_iid_rows_are_identical() {
        let chain = tauchen(0.0, 0.0, 1.0, 2.0, 5).unwrap();
        for i in 1..5 {
            for j in 0..5 {
                assert_relative_eq!(chain.probability(i, j), chain.probability(0, j), epsilon = 1e-15);
            }
        }
        // With iid shocks every row is already the ergodic distribution
        for j in 0..5 {
            assert_relative_eq!(chain.ergodic()[j], chain.probability(0, j), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tauchen_symmetric_process() {
        let chain = tauchen(0.0, 0.8, 0.1, 3.0, 7).unwrap();
        for i in 0..7 {
            for j in 0..7 {
                assert_relative_eq!(
                    chain.probability(i, j),
                    chain.probability(6 - i, 6 - j),
                    epsilon = 1e-14
                );
            }
        }
    }

    #[test]
    fn test_tauchen_rejects_bad_parameters() {
        assert!(matches!(
            tauchen(0.0, 1.0, 0.1, 3.0, 7),
            Err(DiscretisationError::InvalidParameter(_))
        ));
        assert!(matches!(
            tauchen(0.0, 0.5, 0.0, 3.0, 7),
            Err(DiscretisationError::InvalidParameter(_))
        ));
        assert!(matches!(
            tauchen(0.0, 0.5, 0.1, -1.0, 7),
            Err(DiscretisationError::InvalidParameter(_))
        ));
        assert!(matches!(
            tauchen(0.0, 0.5, 0.1, 3.0, 1),
            Err(DiscretisationError::InvalidParameter(_))
        ));
        assert!(matches!(
            tauchen(f64::NAN, 0.5, 0.1, 3.0, 7),
            Err(DiscretisationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_cutoff_zeroes_small_probabilities() {
        let chain = tauchen(0.0, 0.9, 0.1, 3.0, 7).unwrap();
        let ergodic = chain.ergodic().to_vec();
        let cut = chain.with_cutoff(1e-3);
        assert!(cut.transition().iter().all(|&p| p == 0.0 || p >= 1e-3));
        assert_eq!(cut.probability(0, 6), 0.0);
        assert_eq!(cut.ergodic(), &ergodic[..]);
    }

    // ========================================
    // Rouwenhorst
    // ========================================

    #[test]
    fn test_rouwenhorst_two_states() {
        let chain = rouwenhorst(0.0, 0.5, 1.0, 2).unwrap();
        assert_eq!(chain.transition(), &[0.75, 0.25, 0.25, 0.75]);
        assert_relative_eq!(chain.ergodic()[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rouwenhorst_three_states() {
        let rho = 0.4;
        let p = (1.0 + rho) / 2.0;
        let q = 1.0 - p;
        let chain = rouwenhorst(0.0, rho, 1.0, 3).unwrap();
        let expected = [
            p * p,
            2.0 * p * q,
            q * q,
            p * q,
            p * p + q * q,
            p * q,
            q * q,
            2.0 * p * q,
            p * p,
        ];
        for (got, want) in chain.transition().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_rouwenhorst_ergodic_is_binomial() {
        let chain = rouwenhorst(0.0, 0.95, 0.05, 6).unwrap();
        let binomial = [1.0, 5.0, 10.0, 10.0, 5.0, 1.0];
        for (got, c) in chain.ergodic().iter().zip(binomial) {
            assert_relative_eq!(*got, c / 32.0, epsilon = 1e-12);
        }
        assert_rows_sum_to_one(&chain);
        assert_fixed_point(&chain);
    }

    #[test]
    fn test_rouwenhorst_matches_conditional_mean() {
        let (mu, rho) = (0.2, 0.7);
        let chain = rouwenhorst(mu, rho, 0.3, 7).unwrap();
        let x = chain.grid().points().to_vec();
        for i in 0..7 {
            assert_relative_eq!(
                chain.conditional_expectation(i, &x),
                mu + rho * x[i],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_rouwenhorst_grid_width() {
        let (rho, sigma, n) = (0.9, 0.1, 5);
        let chain = rouwenhorst(0.0, rho, sigma, n).unwrap();
        let half = (sigma * sigma / (1.0 - rho * rho)).sqrt() * ((n - 1) as f64).sqrt();
        assert_relative_eq!(chain.grid().first(), -half, epsilon = 1e-12);
        assert_relative_eq!(chain.grid().last(), half, epsilon = 1e-12);
    }

    #[test]
    fn test_log_rouwenhorst_has_mean_one() {
        let chain = log_rouwenhorst(0.97, 0.1, 7).unwrap();
        let mean: f64 = chain
            .grid()
            .points()
            .iter()
            .zip(chain.ergodic())
            .map(|(x, p)| x * p)
            .sum();
        assert_relative_eq!(mean, 1.0, epsilon = 1e-12);
        assert!(chain.grid().first() > 0.0);
        assert_eq!(
            chain.transition(),
            rouwenhorst(0.0, 0.97, 0.1, 7).unwrap().transition()
        );
    }

    #[test]
    fn test_rouwenhorst_f32() {
        let chain = rouwenhorst(0.0_f32, 0.9, 0.1, 5).unwrap();
        let total: f32 = chain.ergodic().iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    // ========================================
    // Ergodic distribution
    // ========================================

    #[test]
    fn test_find_ergodic_two_state() {
        // pi_0 = b / (a + b) for P = [[1-a, a], [b, 1-b]]
        let (a, b) = (0.2, 0.05);
        let pi = find_ergodic(&[1.0 - a, a, b, 1.0 - b], 2).unwrap();
        assert_relative_eq!(pi[0], b / (a + b), epsilon = 1e-14);
        assert_relative_eq!(pi[1], a / (a + b), epsilon = 1e-14);
    }

    #[test]
    fn test_find_ergodic_periodic_chain() {
        let pi = find_ergodic(&[0.0, 1.0, 1.0, 0.0], 2).unwrap();
        assert_relative_eq!(pi[0], 0.5, epsilon = 1e-15);
        assert_relative_eq!(pi[1], 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_find_ergodic_reducible_chain() {
        assert_eq!(
            find_ergodic(&[1.0, 0.0, 0.0, 1.0], 2).unwrap_err(),
            DiscretisationError::NoUniqueErgodic
        );
    }

    #[test]
    fn test_find_ergodic_validates_matrix() {
        assert_eq!(
            find_ergodic(&[1.0, 0.0, 0.0], 2).unwrap_err(),
            DiscretisationError::NotSquare {
                expected: 4,
                got: 3
            }
        );
        assert_eq!(
            find_ergodic(&[0.5, 0.5, 0.7, 0.7], 2).unwrap_err(),
            DiscretisationError::NotStochastic { row: 1 }
        );
        assert_eq!(
            find_ergodic(&[1.5, -0.5, 0.5, 0.5], 2).unwrap_err(),
            DiscretisationError::NotStochastic { row: 0 }
        );
    }

    // ========================================
    // Sampling helpers
    // ========================================

    #[test]
    fn test_cumsums_end_at_one() {
        let chain = rouwenhorst(0.0, 0.5, 0.2, 4).unwrap();
        let cum = chain.transition_cumsum();
        for i in 0..4 {
            assert_relative_eq!(cum[i * 4 + 3], 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(*chain.ergodic_cumsum().last().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_choice_boundaries() {
        let cum = [0.25, 0.5, 1.0];
        assert_eq!(choice(0.0, &cum), 0);
        assert_eq!(choice(0.25, &cum), 0);
        assert_eq!(choice(0.26, &cum), 1);
        assert_eq!(choice(0.99, &cum), 2);
        assert_eq!(choice(1.5, &cum), 2);
        assert_eq!(choice(0.5, &[] as &[f64]), 0);
    }
}
