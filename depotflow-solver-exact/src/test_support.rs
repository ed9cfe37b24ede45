//! Test-only utilities for `depotflow-solver-exact`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use depotflow_core::test_support::{RecordsBuilder, vehicle};
use depotflow_core::{Error, Instance, InstanceRecords, PlannerConfig, Solution, solve};

use crate::ExactSolver;

/// Solve `instance` with a default [`ExactSolver`] through the verified
/// [`solve`] entry point.
///
/// # Errors
///
/// Propagates the solver's [`Error`].
///
/// # Examples
///
/// ```rust
/// use depotflow_core::Instance;
/// use depotflow_core::test_support::single_route_records;
/// use depotflow_solver_exact::test_support::solve_exact;
///
/// let instance = Instance::from_records(single_route_records()).expect("valid instance");
/// let solution = solve_exact(&instance).expect("feasible instance");
/// assert_eq!(solution.active_routes().count(), 1);
/// ```
pub fn solve_exact(instance: &Instance) -> Result<Solution, Error> {
    solve(instance, &ExactSolver::new(), &PlannerConfig::default())
}

/// Two centers where the nearer one cannot ship everything.
///
/// `CD1` (capacity 50) sits next to both clients, `CD2` (capacity 100) is
/// ten units away. Each client needs 40, so one route must start at `CD2`;
/// the optimum sends `V1` from `CD1` to `CL1` and `V2` from `CD2` to `CL2`.
#[must_use]
pub fn two_center_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 50.0, 0.0, 0.0)
        .center("CD2", 100.0, 10.0, 0.0)
        .client("CL1", 40.0, 1.0, 0.0)
        .client("CL2", 40.0, 2.0, 0.0)
        .vehicle(vehicle("V1", 50.0, 500.0, 8.0))
        .vehicle(vehicle("V2", 50.0, 500.0, 8.0))
        .records()
}

/// Clients on a ring around one center, served by `vehicles` equal vehicles.
///
/// Used by benchmarks and size-guard tests. Client `k` sits on a circle of
/// radius 5 with demand 10.
#[must_use]
pub fn ring_records(clients: usize, vehicles: usize) -> InstanceRecords {
    let spokes = u32::try_from(clients.max(1)).unwrap_or(u32::MAX);
    let step = std::f64::consts::TAU / f64::from(spokes);
    let mut builder = RecordsBuilder::new().center("CD1", 1_000.0, 0.0, 0.0);
    let mut angle = 0.0_f64;
    for index in 1..=clients {
        let (y, x) = angle.sin_cos();
        builder = builder.client(&format!("CL{index:02}"), 10.0, 5.0 * x, 5.0 * y);
        angle += step;
    }
    for index in 1..=vehicles {
        builder = builder.vehicle(vehicle(&format!("V{index}"), 60.0, 500.0, 8.0));
    }
    builder.records()
}
