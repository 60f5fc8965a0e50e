//! Gauss-Hermite quadrature for expectations over normal and log-normal shocks.
//!
//! - [`gauss_hermite`]: nodes and weights for `int f(x) exp(-x^2) dx`
//! - [`normal_gauss_hermite`]: rule for `E[f(X)]`, `X ~ N(mu, sigma^2)`
//! - [`log_normal_gauss_hermite`]: rule for a log-normal shock with mean `mu`
//! - [`permanent_transitory_shocks`]: tensor product of permanent and
//!   transitory income shocks, with an optional low-income state
//!
//! An `n`-point rule integrates polynomials up to degree `2n - 1` exactly.
//!
//! # Example
//!
//! ```
//! use egm_core::math::quadrature::normal_gauss_hermite;
//!
//! let rule = normal_gauss_hermite(0.5, 7, 1.0).unwrap();
//! let second_moment = rule.expect(|x: f64| x * x);
//! assert!((second_moment - 1.25).abs() < 1e-12);
//! ```

use super::lit;
use super::solvers::{NewtonRaphsonSolver, SolverConfig};
use crate::types::DiscretisationError;
use num_traits::Float;

/// Quadrature nodes with matching weights, ordered by increasing node.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule<T: Float> {
    /// Evaluation points
    pub nodes: Vec<T>,
    /// Weight of each node
    pub weights: Vec<T>,
}

impl<T: Float> QuadratureRule<T> {
    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the rule has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Weighted sum `sum_i w_i f(x_i)`.
    pub fn expect<F: Fn(T) -> T>(&self, f: F) -> T {
        self.nodes
            .iter()
            .zip(&self.weights)
            .fold(T::zero(), |acc, (&x, &w)| acc + w * f(x))
    }

    fn degenerate(value: T, n: usize) -> Self {
        let weight = T::one() / lit(n as f64);
        Self {
            nodes: vec![value; n],
            weights: vec![weight; n],
        }
    }
}

/// Physicists' Gauss-Hermite rule with `n` nodes.
///
/// Integrates against `exp(-x^2)`, so the weights sum to `sqrt(pi)`. Each
/// positive root of the orthonormal Hermite polynomial is refined by
/// Newton-Raphson from an asymptotic starting guess; the negative roots
/// follow by symmetry.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - `n == 0`
/// * `Err(DiscretisationError::Solver)` - A root failed to converge
///
/// # Example
///
/// ```
/// use egm_core::math::quadrature::gauss_hermite;
///
/// let rule = gauss_hermite::<f64>(3).unwrap();
/// assert!((rule.nodes[2] - 1.5_f64.sqrt()).abs() < 1e-14);
/// ```
pub fn gauss_hermite<T: Float>(n: usize) -> Result<QuadratureRule<T>, DiscretisationError> {
    if n == 0 {
        return Err(DiscretisationError::InvalidParameter(
            "quadrature needs at least one node".to_string(),
        ));
    }

    let tolerance = T::epsilon() * lit(64.0);
    let solver = NewtonRaphsonSolver::new(
        SolverConfig::new(tolerance, 100).with_relative_tolerance(tolerance),
    );
    let mut nodes = vec![T::zero(); n];
    let mut weights = vec![T::zero(); n];
    let nf = n as f64;

    // Roots from largest to smallest; the guesses use the roots already found
    let mut z = T::zero();
    for i in 0..(n + 1) / 2 {
        z = match i {
            0 => lit::<T>((2.0 * nf + 1.0).sqrt() - 1.85575 * (2.0 * nf + 1.0).powf(-0.16667)),
            1 => z - lit::<T>(1.14 * nf.powf(0.426)) / z,
            2 => lit::<T>(1.86) * z - lit::<T>(0.86) * nodes[n - 1],
            3 => lit::<T>(1.91) * z - lit::<T>(0.91) * nodes[n - 2],
            _ => lit::<T>(2.0) * z - nodes[n + 1 - i],
        };

        let root = solver.find_root(
            |x| hermite(n, x).0,
            |x| hermite(n, x).1,
            z,
        )?;
        z = root.root;

        let derivative = hermite(n, z).1;
        let weight = lit::<T>(2.0) / (derivative * derivative);
        nodes[n - 1 - i] = z;
        nodes[i] = -z;
        weights[n - 1 - i] = weight;
        weights[i] = weight;
    }

    // The middle root of an odd rule is exactly zero
    if n % 2 == 1 {
        nodes[n / 2] = T::zero();
    }

    Ok(QuadratureRule { nodes, weights })
}

/// Rule for `E[f(X)]` with `X ~ N(mu, sigma^2)`.
///
/// Weights sum to one. With `sigma == 0` or `n == 1` every node is `mu` and
/// every weight `1 / n`.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - `n == 0`, negative or
///   non-finite `sigma`, or non-finite `mu`
pub fn normal_gauss_hermite<T: Float>(
    sigma: T,
    n: usize,
    mu: T,
) -> Result<QuadratureRule<T>, DiscretisationError> {
    check_shock(sigma, n)?;
    if !mu.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "mean must be finite".to_string(),
        ));
    }
    if sigma == T::zero() || n == 1 {
        return Ok(QuadratureRule::degenerate(mu, n));
    }

    let scale = lit::<T>(std::f64::consts::SQRT_2) * sigma;
    let norm = lit::<T>(std::f64::consts::PI).sqrt();
    let rule = gauss_hermite(n)?;
    Ok(QuadratureRule {
        nodes: rule.nodes.into_iter().map(|x| mu + scale * x).collect(),
        weights: rule.weights.into_iter().map(|w| w / norm).collect(),
    })
}

/// Rule for a log-normal shock `mu * exp(Z - sigma^2 / 2)`, `Z ~ N(0, sigma^2)`.
///
/// The shock has mean `mu` (one for a pure income shock). With `sigma == 0`
/// or `n == 1` every node is `mu`.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - `n == 0`, negative or
///   non-finite `sigma`, or `mu <= 0`
pub fn log_normal_gauss_hermite<T: Float>(
    sigma: T,
    n: usize,
    mu: T,
) -> Result<QuadratureRule<T>, DiscretisationError> {
    check_shock(sigma, n)?;
    if !(mu > T::zero()) || !mu.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "log-normal mean must be positive and finite".to_string(),
        ));
    }
    if sigma == T::zero() || n == 1 {
        return Ok(QuadratureRule::degenerate(mu, n));
    }

    let shift = mu.ln() - sigma * sigma / lit(2.0);
    let normal = normal_gauss_hermite(sigma, n, T::zero())?;
    Ok(QuadratureRule {
        nodes: normal.nodes.into_iter().map(|x| (x + shift).exp()).collect(),
        weights: normal.weights,
    })
}

/// Low-income state mixed into the transitory shock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowIncomeShock<T: Float> {
    /// Probability of the low-income state, in `[0, 1)`
    pub probability: T,
    /// Transitory income in the low-income state
    pub value: T,
}

/// Tensor-product rule over permanent (`psi`) and transitory (`xi`) shocks.
///
/// Entries are flattened with `psi` outer and `xi` inner; entry `k` has
/// joint weight `psi_w[k] * xi_w[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PermanentTransitoryShocks<T: Float> {
    /// Permanent shock at each entry
    pub psi: Vec<T>,
    /// Permanent shock weight at each entry
    pub psi_w: Vec<T>,
    /// Transitory shock at each entry
    pub xi: Vec<T>,
    /// Transitory shock weight at each entry
    pub xi_w: Vec<T>,
}

impl<T: Float> PermanentTransitoryShocks<T> {
    /// Number of joint shock nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.psi.len()
    }

    /// Always false for a constructed rule.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.psi.is_empty()
    }

    /// Joint weight of entry `k`.
    #[inline]
    pub fn weight(&self, k: usize) -> T {
        self.psi_w[k] * self.xi_w[k]
    }

    /// Expectation `E[f(psi, xi)]` under the joint rule.
    pub fn expect<F: Fn(T, T) -> T>(&self, f: F) -> T {
        (0..self.len()).fold(T::zero(), |acc, k| {
            acc + self.weight(k) * f(self.psi[k], self.xi[k])
        })
    }
}

/// Log-normal permanent and transitory income shocks on a joint rule.
///
/// Both shocks have mean one. With a [`LowIncomeShock`] of probability `pi`
/// and value `mu`, the transitory rule gains a leading node `mu` of weight
/// `pi`; the remaining nodes are rescaled to `(xi - mu pi) / (1 - pi)` with
/// weights scaled by `1 - pi`, which keeps the mean at one.
///
/// # Returns
///
/// * `Err(DiscretisationError::InvalidParameter)` - Invalid shock parameters,
///   or a low-income probability outside `[0, 1)`
///
/// # Example
///
/// ```
/// use egm_core::math::quadrature::{permanent_transitory_shocks, LowIncomeShock};
///
/// let low = LowIncomeShock { probability: 0.05, value: 0.3 };
/// let shocks = permanent_transitory_shocks(0.1, 5, 0.1, 5, Some(low)).unwrap();
/// assert_eq!(shocks.len(), 5 * 6);
/// assert!((shocks.expect(|_, xi: f64| xi) - 1.0).abs() < 1e-10);
/// ```
pub fn permanent_transitory_shocks<T: Float>(
    sigma_psi: T,
    n_psi: usize,
    sigma_xi: T,
    n_xi: usize,
    low_income: Option<LowIncomeShock<T>>,
) -> Result<PermanentTransitoryShocks<T>, DiscretisationError> {
    let permanent = log_normal_gauss_hermite(sigma_psi, n_psi, T::one())?;
    let mut transitory = log_normal_gauss_hermite(sigma_xi, n_xi, T::one())?;

    if let Some(low) = low_income {
        let pi = low.probability;
        if !(pi >= T::zero() && pi < T::one()) || !low.value.is_finite() {
            return Err(DiscretisationError::InvalidParameter(
                "low-income probability must lie in [0, 1) with a finite value".to_string(),
            ));
        }
        if pi > T::zero() {
            let keep = T::one() - pi;
            let mut nodes = vec![low.value];
            nodes.extend(
                transitory
                    .nodes
                    .iter()
                    .map(|&x| (x - low.value * pi) / keep),
            );
            let mut weights = vec![pi];
            weights.extend(transitory.weights.iter().map(|&w| w * keep));
            transitory = QuadratureRule { nodes, weights };
        }
    }

    let size = permanent.len() * transitory.len();
    let mut shocks = PermanentTransitoryShocks {
        psi: Vec::with_capacity(size),
        psi_w: Vec::with_capacity(size),
        xi: Vec::with_capacity(size),
        xi_w: Vec::with_capacity(size),
    };
    for (&psi, &psi_w) in permanent.nodes.iter().zip(&permanent.weights) {
        for (&xi, &xi_w) in transitory.nodes.iter().zip(&transitory.weights) {
            shocks.psi.push(psi);
            shocks.psi_w.push(psi_w);
            shocks.xi.push(xi);
            shocks.xi_w.push(xi_w);
        }
    }

    Ok(shocks)
}

/// Orthonormal Hermite polynomial `p_n(x)` and its derivative.
///
/// `p_n` is normalised against `exp(-x^2)`; `p_n' = sqrt(2n) p_{n-1}`.
fn hermite<T: Float>(n: usize, x: T) -> (T, T) {
    let mut p = lit::<T>(std::f64::consts::PI).powf(lit(-0.25));
    let mut prev = T::zero();
    for j in 1..=n {
        let jf = j as f64;
        let next = x * lit::<T>((2.0 / jf).sqrt()) * p - lit::<T>(((jf - 1.0) / jf).sqrt()) * prev;
        prev = p;
        p = next;
    }
    (p, lit::<T>((2.0 * n as f64).sqrt()) * prev)
}

fn check_shock<T: Float>(sigma: T, n: usize) -> Result<(), DiscretisationError> {
    if n == 0 {
        return Err(DiscretisationError::InvalidParameter(
            "quadrature needs at least one node".to_string(),
        ));
    }
    if !(sigma >= T::zero()) || !sigma.is_finite() {
        return Err(DiscretisationError::InvalidParameter(
            "shock standard deviation must be non-negative and finite".to_string(),
        ));
    }
    Ok(())
}
