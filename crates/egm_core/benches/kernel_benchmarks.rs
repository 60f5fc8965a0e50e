//! Criterion benchmarks for the EGM kernels.
//!
//! Measures multilinear batch evaluation, the scalar solvers and the upper
//! envelope across grid sizes to characterise scaling behaviour.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use egm_core::math::envelope::{upper_envelope, Candidate, EgmEnvelope};
use egm_core::math::grid::Grid;
use egm_core::math::interpolators::MultilinearInterpolator;
use egm_core::math::solvers::{GoldenSectionSolver, NewtonRaphsonSolver, SolverConfig};

/// 2-D interpolator on an `n x n` asset-by-income grid.
fn interpolator_2d(n: usize) -> MultilinearInterpolator<f64> {
    let ga = Grid::nonlinspace(0.0, 20.0, n, 1.3).unwrap();
    let gy = Grid::linspace(0.5, 1.5, n).unwrap();
    let values: Vec<f64> = ga
        .points()
        .iter()
        .flat_map(|&a| gy.points().iter().map(move |&y| (a + y).ln()))
        .collect();
    MultilinearInterpolator::new(vec![ga, gy], values).unwrap()
}

/// Sorted query batch covering the grid, with some extrapolation.
fn sorted_points(n: usize) -> Vec<f64> {
    (0..n)
        .flat_map(|i| {
            let s = i as f64 / (n - 1) as f64;
            [21.0 * s, 0.4 + 1.2 * s]
        })
        .collect()
}

/// Benchmark multilinear batch evaluation, sorted against reversed.
fn bench_multilinear(c: &mut Criterion) {
    let mut group = c.benchmark_group("multilinear_batch");

    for size in [50, 200, 1000] {
        let interp = interpolator_2d(size);
        let sorted = sorted_points(10_000);
        // Same points walked backwards: the hint check only looks forward
        let reversed: Vec<f64> = sorted
            .chunks_exact(2)
            .rev()
            .flat_map(|p| [p[0], p[1]])
            .collect();

        group.bench_with_input(BenchmarkId::new("sorted", size), &sorted, |b, pts| {
            b.iter(|| interp.evaluate_batch(black_box(pts)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("reversed", size), &reversed, |b, pts| {
            b.iter(|| interp.evaluate_batch(black_box(pts)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("along_last", size), &size, |b, _| {
            let ys: Vec<f64> = (0..10_000).map(|i| 0.4 + 1.2 * i as f64 / 9_999.0).collect();
            b.iter(|| interp.evaluate_along_last(black_box(&[7.5]), black_box(&ys)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark golden-section search and Newton-Raphson on a consumption FOC.
fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("solvers");
    let m = 5.0_f64;
    let objective = |c: f64| -(c.ln() + 0.95 * (m - c + 1.0).ln());

    group.bench_function("golden_section", |b| {
        let solver = GoldenSectionSolver::new(SolverConfig::new(1e-10, 200));
        b.iter(|| solver.minimize(objective, black_box(1e-6), black_box(m)).unwrap());
    });

    group.bench_function("newton_raphson", |b| {
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12, 100));
        let foc = |c: f64| 1.0 / c - 0.95 / (m - c + 1.0);
        let dfoc = |c: f64| -1.0 / (c * c) - 0.95 / ((m - c + 1.0) * (m - c + 1.0));
        b.iter(|| solver.find_root(foc, dfoc, black_box(1.0)).unwrap());
    });

    group.finish();
}

/// Benchmark the generic and EGM envelopes on a folded candidate.
fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("upper_envelope");

    for size in [100, 1000] {
        // m(a) folds back once in the middle of the asset grid
        let grid_a: Vec<f64> = (0..size).map(|i| 10.0 * i as f64 / (size - 1) as f64).collect();
        let m: Vec<f64> = grid_a
            .iter()
            .map(|&a| 2.0 + a + 2.5 * (a - 5.0) * (-(a - 5.0).powi(2)).exp())
            .collect();
        let cons: Vec<f64> = grid_a.iter().zip(&m).map(|(a, m)| m - a).collect();
        let w: Vec<f64> = grid_a.iter().map(|&a| (1.0 + a).ln()).collect();
        let out = Grid::linspace(0.5, 12.0, size).unwrap();

        let candidate = Candidate::new(m.clone(), w.clone(), cons.clone());
        group.bench_with_input(BenchmarkId::new("generic", size), &out, |b, out| {
            b.iter(|| upper_envelope(black_box(std::slice::from_ref(&candidate)), out).unwrap());
        });

        let egm = EgmEnvelope::new(|c: f64| c.ln());
        group.bench_with_input(BenchmarkId::new("egm", size), &out, |b, out| {
            b.iter(|| egm.compute(&grid_a, &m, &cons, &w, black_box(out)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_multilinear, bench_solvers, bench_envelope);
criterion_main!(benches);
