//! Integration tests for module exports.
//!
//! Verify that all public modules and types are reachable via absolute paths.

/// Grid and builders are accessible.
#[test]
fn test_grid_exports() {
    use egm_core::math::grid::Grid;

    let g: Grid<f64> = Grid::linspace(0.0, 1.0, 5).unwrap();
    assert_eq!(g.len(), 5);
    let _ = Grid::nonlinspace(0.0, 1.0, 5, 1.1).unwrap();
    let _ = Grid::equilogspace(0.0, 1.0, 5).unwrap();
    let _ = Grid::try_from(vec![0.0, 1.0]).unwrap();
}

/// Interpolators are accessible.
#[test]
fn test_interpolator_exports() {
    use egm_core::math::grid::Grid;
    use egm_core::math::interpolators::{
        interpolate, Interpolator, LinearInterpolator, LocatedCell, MultilinearInterpolator,
    };

    let g = Grid::new(vec![0.0, 1.0]).unwrap();
    let li = LinearInterpolator::new(g.clone(), vec![0.0, 1.0]).unwrap();
    assert_eq!(li.interpolate(0.5).unwrap(), 0.5);

    let mi = MultilinearInterpolator::new(vec![g.clone()], vec![0.0, 1.0]).unwrap();
    assert_eq!(mi.evaluate(&[0.5]).unwrap(), 0.5);
    let cell: LocatedCell<f64> = mi.locate(&[0.5]).unwrap();
    assert_eq!(mi.blend(&cell, &[2.0, 4.0]).unwrap(), 3.0);

    assert_eq!(interpolate(&[g], &[0.0, 1.0], &[0.5]).unwrap(), vec![0.5]);
}

/// Solvers are accessible.
#[test]
fn test_solver_exports() {
    use egm_core::math::solvers::{
        golden_section_search, newton_raphson, GoldenSectionResult, GoldenSectionSolver,
        NewtonRaphsonSolver, RootResult, SolverConfig,
    };

    let _: GoldenSectionSolver<f64> = GoldenSectionSolver::new(SolverConfig::fast());
    let _: NewtonRaphsonSolver<f64> = NewtonRaphsonSolver::with_defaults();

    let g: GoldenSectionResult<f64> =
        golden_section_search(|x: f64| x * x, -1.0, 1.0, 1e-8, 100).unwrap();
    assert!(g.converged);

    let r: RootResult<f64> =
        newton_raphson(|x: f64| x - 1.0, |_x: f64| 1.0, 0.0, 1e-12, 10).unwrap();
    assert_eq!(r.root, 1.0);
}

/// Envelope types are accessible.
#[test]
fn test_envelope_exports() {
    use egm_core::math::envelope::{
        upper_envelope, upper_envelope_with, Candidate, EgmEnvelope, EgmSolution, Envelope,
        EnvelopeConfig, FoldPolicy,
    };
    use egm_core::math::grid::Grid;

    let c = Candidate::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]);
    let out = Grid::new(vec![0.0, 1.0]).unwrap();
    let e: Envelope<f64> = upper_envelope(&[c.clone()], &out).unwrap();
    assert_eq!(e.uncovered_count(), 0);

    let config = EnvelopeConfig {
        fold_policy: FoldPolicy::Retain,
        extrapolate_above: false,
    };
    let _ = upper_envelope_with(&[c], &out, &config).unwrap();

    let s: EgmSolution<f64> = EgmEnvelope::new(|c: f64| c)
        .compute(&[0.0, 1.0], &[1.0, 2.0], &[1.0, 1.0], &[0.0, 0.0], &out)
        .unwrap();
    assert_eq!(s.consumption.len(), 2);
}

/// Shock discretisation is accessible.
#[test]
fn test_shock_exports() {
    use egm_core::math::markov::{
        choice, find_ergodic, log_rouwenhorst, rouwenhorst, tauchen, MarkovChain,
    };
    use egm_core::math::quadrature::{
        gauss_hermite, log_normal_gauss_hermite, normal_gauss_hermite,
        permanent_transitory_shocks, LowIncomeShock, PermanentTransitoryShocks, QuadratureRule,
    };

    let chain: MarkovChain<f64> = tauchen(0.0, 0.5, 0.1, 3.0, 5).unwrap();
    let _ = rouwenhorst(0.0, 0.5, 0.1, 5).unwrap();
    let _ = log_rouwenhorst(0.5, 0.1, 5).unwrap();
    let _ = find_ergodic(chain.transition(), chain.len()).unwrap();
    assert_eq!(choice(0.0, &chain.ergodic_cumsum()), 0);

    let _: QuadratureRule<f64> = gauss_hermite(3).unwrap();
    let _ = normal_gauss_hermite(0.1, 3, 0.0).unwrap();
    let _ = log_normal_gauss_hermite(0.1, 3, 1.0).unwrap();
    let low = LowIncomeShock {
        probability: 0.1,
        value: 0.0,
    };
    let shocks: PermanentTransitoryShocks<f64> =
        permanent_transitory_shocks(0.1, 3, 0.1, 3, Some(low)).unwrap();
    assert_eq!(shocks.len(), 12);
}

/// Error types are accessible.
#[test]
fn test_error_exports() {
    use egm_core::types::{
        ConvergenceWarning, DiscretisationError, EnvelopeError, GridError, InterpolationError,
        SolverError,
    };

    let _ = GridError::InsufficientPoints { got: 0, need: 2 };
    let _ = InterpolationError::NonFiniteQuery { dimension: 0 };
    let _ = SolverError::InvalidBracket { a: 0.0, b: 1.0 };
    let _ = EnvelopeError::NoCandidates;
    let _ = DiscretisationError::NoUniqueErgodic;
    let _ = ConvergenceWarning {
        iterations: 1,
        width: 1.0,
    };
}

/// Parallel helpers are accessible.
#[cfg(feature = "parallel")]
#[test]
fn test_parallel_exports() {
    use egm_core::parallel::{
        par_interpolate, par_upper_envelope_with, ParallelConfig, DEFAULT_BATCH_SIZE,
    };

    assert_eq!(ParallelConfig::default().batch_size, DEFAULT_BATCH_SIZE);
    let _ = par_interpolate::<f64>;
    let _ = par_upper_envelope_with::<f64>;
}
