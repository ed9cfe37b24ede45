//! Criterion benchmarks for the exact solver.
//!
//! Measures solve time as the client count grows towards the default size
//! ceiling, to keep the oracle's runtime predictable.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package depotflow-solver-exact
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use depotflow_core::{Formulation, Instance, Solver};
use depotflow_solver_exact::ExactSolver;

mod bench_support;

use bench_support::{BENCHMARK_SEED, generate_instance};

/// Client counts to benchmark.
const PROBLEM_SIZES: &[usize] = &[4, 6, 8];

/// Vehicles in every benchmark instance.
const FLEET_SIZE: usize = 3;

fn bench_solve_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_solve_time");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for &size in PROBLEM_SIZES {
        let Ok(instance) =
            Instance::from_records(generate_instance(size, FLEET_SIZE, BENCHMARK_SEED))
        else {
            continue;
        };
        let formulation = Formulation::build(&instance);
        let solver = ExactSolver::new();

        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::new("clients", size), &size, |b, _| {
            b.iter(|| {
                #[expect(
                    clippy::let_underscore_must_use,
                    reason = "Benchmarking solve performance, result is intentionally discarded"
                )]
                let _ = solver.solve(&instance, &formulation);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_times);
criterion_main!(benches);
