//! Benchmarks for the batched complex solver.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use seep_solver::solve_batch_complex;

fn bench_solve_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_batch_complex");

    // one system per Laplace parameter of a typical single-interval grid
    let batch = 41;
    for size in [2, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, &size| {
            let mats: Vec<DMatrix<Complex<f64>>> = (0..batch)
                .map(|k| {
                    DMatrix::from_fn(size, size, |i, j| {
                        if i == j {
                            Complex::new(size as f64 + 1.0, 0.3 * k as f64)
                        } else {
                            Complex::new(1.0 / ((i as f64 - j as f64).abs() + 1.0), 0.1)
                        }
                    })
                })
                .collect();
            let rhs: Vec<DVector<Complex<f64>>> = (0..batch)
                .map(|k| DVector::from_fn(size, |i, _| Complex::new((i + 1) as f64, k as f64)))
                .collect();

            bencher.iter(|| solve_batch_complex(black_box(&mats), black_box(&rhs)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_batch);
criterion_main!(benches);
