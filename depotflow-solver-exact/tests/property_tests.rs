#![expect(
    clippy::expect_used,
    reason = "property tests use expect for readable failures"
)]

//! Property-based tests for the exact solver.
//!
//! These tests use `proptest` to assert invariants that must hold for all
//! small instances, complementing the golden plan regression tests and BDD
//! behavioural tests.
//!
//! # Invariants tested
//!
//! - **Validity:** Every returned solution passes the invariant checker and
//!   its formulation audit.
//! - **Access:** No route touches a node its vehicle is barred from, and
//!   every route starts at a center the vehicle may launch from.
//! - **Determinism:** Solving the same instance twice gives equal solutions.
//! - **Monotonicity:** Adding a vehicle never raises the optimal cost.
//! - **Diagnosis:** Capacity shortfalls are reported as such.
//! - **KPI bounds:** Utilizations stay within `[0, 1]`.

mod proptest_support;

use depotflow_core::{
    Formulation, InfeasibilityReason, Instance, PlannerConfig, SolveError, extract_kpis, solve,
    verify,
};
use depotflow_solver_exact::ExactSolver;
use proptest::prelude::*;

use proptest_support::instance_strategy;

const TOLERANCE: f64 = 1e-6;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: Any solution returned is valid and matches its formulation.
    #[test]
    fn solutions_are_valid(records in instance_strategy()) {
        let instance = Instance::from_records(records).expect("generated instance is valid");
        if let Ok(solution) = solve(&instance, &ExactSolver::new(), &PlannerConfig::default()) {
            prop_assert_eq!(verify(&solution, &instance, TOLERANCE), Ok(()));
            let audit = Formulation::build(&instance)
                .audit(&solution, TOLERANCE)
                .expect("solution maps onto its formulation");
            prop_assert!(audit.is_feasible(), "violations: {:?}", audit.violations);
            prop_assert!((audit.objective - solution.objective()).abs() < TOLERANCE);
        }
    }

    /// Property: Routes honour access rules and home centers.
    #[test]
    fn routes_honour_access_and_home_centers(records in instance_strategy()) {
        let instance = Instance::from_records(records).expect("generated instance is valid");
        if let Ok(solution) = solve(&instance, &ExactSolver::new(), &PlannerConfig::default()) {
            for route in solution.active_routes() {
                let vehicle = instance
                    .vehicle(route.vehicle().as_str())
                    .expect("route names a known vehicle");
                let center = route.center().expect("active route has a center");
                prop_assert!(
                    instance
                        .candidate_centers(vehicle)
                        .any(|candidate| candidate.id == *center)
                );
                if let Some(home) = &vehicle.home_center {
                    prop_assert_eq!(home, center);
                }
                for node in route.sequence() {
                    prop_assert!(instance.is_allowed(node.as_str(), vehicle.id.as_str()));
                }
            }
        }
    }

    /// Property: The solver is deterministic.
    #[test]
    fn solving_is_deterministic(records in instance_strategy()) {
        let instance = Instance::from_records(records).expect("generated instance is valid");
        let solver = ExactSolver::new();
        let formulation = Formulation::build(&instance);
        let first = depotflow_core::Solver::solve(&solver, &instance, &formulation);
        let second = depotflow_core::Solver::solve(&solver, &instance, &formulation);
        prop_assert_eq!(first, second);
    }

    /// Property: An extra copy of the first vehicle never makes the plan
    /// more expensive or infeasible.
    #[test]
    fn extra_vehicle_never_hurts(records in instance_strategy()) {
        let instance = Instance::from_records(records.clone()).expect("generated instance is valid");
        let Ok(base) = solve(&instance, &ExactSolver::new(), &PlannerConfig::default()) else {
            return Ok(());
        };
        let mut extended = records;
        let mut spare = extended.vehicles.first().cloned().expect("at least one vehicle");
        spare.id = "V9".to_owned();
        extended.vehicles.push(spare);
        let larger = Instance::from_records(extended).expect("extended instance is valid");
        let improved = solve(&larger, &ExactSolver::new(), &PlannerConfig::default())
            .expect("extra vehicle keeps the instance feasible");
        prop_assert!(improved.objective() <= base.objective() + TOLERANCE);
    }

    /// Property: Fleet and center shortfalls are diagnosed before search.
    #[test]
    fn capacity_shortfalls_are_diagnosed(records in instance_strategy()) {
        let instance = Instance::from_records(records).expect("generated instance is valid");
        let result = solve(&instance, &ExactSolver::new(), &PlannerConfig::default());
        let demand = instance.total_demand();
        if demand > instance.fleet_capacity() + TOLERANCE {
            let is_fleet = matches!(
                result,
                Err(SolveError::Infeasible { reason: InfeasibilityReason::FleetCapacity { .. } })
            );
            prop_assert!(is_fleet);
        } else if demand > instance.center_capacity() + TOLERANCE {
            let is_center = matches!(
                result,
                Err(SolveError::Infeasible { reason: InfeasibilityReason::CenterCapacity { .. } })
            );
            prop_assert!(is_center);
        }
    }

    /// Property: Vehicle and center utilizations lie in `[0, 1]`.
    #[test]
    fn utilizations_are_bounded(records in instance_strategy()) {
        let instance = Instance::from_records(records).expect("generated instance is valid");
        let config = PlannerConfig::default();
        if let Ok(solution) = solve(&instance, &ExactSolver::new(), &config) {
            let report = extract_kpis(&solution, &instance, &config).expect("valid solution");
            for kpi in &report.vehicles {
                prop_assert!((0.0..=1.0 + TOLERANCE).contains(&kpi.utilization));
                prop_assert!((0.0..=1.0 + TOLERANCE).contains(&kpi.range_utilization));
            }
            for kpi in &report.centers {
                prop_assert!((0.0..=1.0 + TOLERANCE).contains(&kpi.capacity_utilization));
            }
            prop_assert!((report.total_cost - solution.objective()).abs() < TOLERANCE);
        }
    }
}
