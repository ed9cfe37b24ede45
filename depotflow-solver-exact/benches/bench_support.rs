//! Benchmark support utilities for the exact solver.
//!
//! Provides deterministic planar instances with clustered clients so runs
//! are reproducible across machines.

use depotflow_core::InstanceRecords;
use depotflow_core::test_support::{RecordsBuilder, vehicle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Side length of the square clients are scattered over.
const AREA_SIZE: f64 = 20.0;

/// Generate an instance with two centers, `clients` clients and `vehicles`
/// vehicles of alternating capacity.
#[must_use]
pub fn generate_instance(clients: usize, vehicles: usize, seed: u64) -> InstanceRecords {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = RecordsBuilder::new()
        .center("CD1", 400.0, 0.0, 0.0)
        .center("CD2", 400.0, AREA_SIZE, AREA_SIZE);
    for index in 1..=clients {
        let demand = f64::from(rng.gen_range(5_u32..=25));
        let x = rng.gen_range(0.0..AREA_SIZE);
        let y = rng.gen_range(0.0..AREA_SIZE);
        builder = builder.client(&format!("CL{index}"), demand, x, y);
    }
    for index in 1..=vehicles {
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "Modulo for alternating capacities is intentional"
        )]
        let capacity = if index % 2 == 0 { 60.0 } else { 100.0 };
        builder = builder.vehicle(vehicle(&format!("V{index}"), capacity, 200.0, 8.0));
    }
    builder.records()
}
