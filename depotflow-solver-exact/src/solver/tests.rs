//! Tests for the `ExactSolver`.

use super::*;
use depotflow_core::test_support::{
    RecordsBuilder, access_denied_records, over_capacity_records, short_range_records,
    single_route_records, two_vehicle_records, vehicle,
};
use depotflow_core::{InstanceRecords, PlannerConfig, solve, verify};
use rstest::rstest;

use crate::test_support::{ring_records, solve_exact, two_center_records};

fn instance(records: InstanceRecords) -> Instance {
    Instance::from_records(records).expect("valid instance")
}

fn sequence(solution: &Solution, vehicle: &str) -> String {
    solution
        .route(vehicle)
        .expect("route for every vehicle")
        .sequence()
        .iter()
        .map(|node| node.as_str())
        .collect::<Vec<_>>()
        .join("-")
}

fn reason(result: Result<Solution, Error>) -> InfeasibilityReason {
    match result {
        Err(SolveError::Infeasible { reason }) => reason,
        other => panic!("expected infeasibility, got {other:?}"),
    }
}

#[rstest]
fn single_route_visits_both_clients() {
    let instance = instance(single_route_records());
    let solution = solve_exact(&instance).expect("feasible instance");
    assert_eq!(sequence(&solution, "V1"), "CD1-CL1-CL2-CD1");
    assert!((solution.objective() - 66.2).abs() < 1e-9);
    assert_eq!(solution.strategy(), "exact");
}

#[rstest]
fn two_vehicles_split_clients_by_capacity() {
    let instance = instance(two_vehicle_records());
    let solution = solve_exact(&instance).expect("feasible instance");
    assert_eq!(sequence(&solution, "V1"), "CD1-CL1-CD1");
    assert_eq!(sequence(&solution, "V2"), "CD1-CL2-CD1");
    assert!((solution.objective() - 129.7).abs() < 1e-9);
}

#[rstest]
fn joint_center_choice_respects_capacity() {
    let instance = instance(two_center_records());
    let solution = solve_exact(&instance).expect("feasible instance");
    assert_eq!(sequence(&solution, "V1"), "CD1-CL1-CD1");
    assert_eq!(sequence(&solution, "V2"), "CD2-CL2-CD2");
    let dispatched = solution.dispatched_by_center();
    assert_eq!(dispatched.get(&NodeId::from("CD1")).copied(), Some(40.0));
    assert_eq!(dispatched.get(&NodeId::from("CD2")).copied(), Some(40.0));
}

#[rstest]
fn equal_vehicles_prefer_the_first() {
    let instance = RecordsBuilder::new()
        .center("CD1", 100.0, 0.0, 0.0)
        .client("CL1", 10.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 50.0, 500.0, 8.0))
        .vehicle(vehicle("V2", 50.0, 500.0, 8.0))
        .build()
        .expect("valid instance");
    let solution = solve_exact(&instance).expect("feasible instance");
    assert_eq!(sequence(&solution, "V1"), "CD1-CL1-CD1");
    assert!(!solution.route("V2").expect("idle route").is_active());
}

#[rstest]
fn mirrored_tours_resolve_to_the_smaller_sequence() {
    let instance = RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL2", 20.0, 0.0, 10.0)
        .client("CL3", 20.0, -7.0, -6.0)
        .service_time("CL2", 1.5)
        .service_time("CL3", 1.0)
        .vehicle(vehicle("V1", 100.0, 200.0, 4.0))
        .build()
        .expect("valid instance");
    let solution = solve_exact(&instance).expect("feasible instance");
    assert_eq!(sequence(&solution, "V1"), "CD1-CL2-CL3-CD1");
}

#[rstest]
fn repeated_solves_are_identical() {
    let instance = instance(ring_records(6, 2));
    let first = solve_exact(&instance).expect("feasible instance");
    let second = solve_exact(&instance).expect("feasible instance");
    assert_eq!(first, second);
}

#[rstest]
fn empty_client_list_leaves_fleet_idle() {
    let instance = RecordsBuilder::new()
        .center("CD1", 100.0, 0.0, 0.0)
        .vehicle(vehicle("V1", 50.0, 500.0, 8.0))
        .build()
        .expect("valid instance");
    let solution = solve_exact(&instance).expect("trivially feasible");
    assert_eq!(solution.active_routes().count(), 0);
    assert!(solution.objective().abs() < f64::EPSILON);
}

#[rstest]
fn home_center_is_used() {
    let mut records = two_center_records();
    for record in &mut records.vehicles {
        record.home_center = Some("CD2".to_owned());
    }
    records.centers.iter_mut().for_each(|center| center.capacity = 100.0);
    let instance = instance(records);
    let solution = solve_exact(&instance).expect("feasible instance");
    for route in solution.active_routes() {
        assert_eq!(route.center().map(NodeId::as_str), Some("CD2"));
    }
}

#[rstest]
fn fleet_shortfall_is_diagnosed() {
    let instance = instance(over_capacity_records());
    let solver = ExactSolver::new();
    let result = solver.solve(&instance, &Formulation::build(&instance));
    assert_eq!(
        reason(result),
        InfeasibilityReason::FleetCapacity {
            demand: 120.0,
            capacity: 100.0,
        }
    );
}

#[rstest]
fn center_shortfall_is_diagnosed() {
    let instance = RecordsBuilder::new()
        .center("CD1", 50.0, 0.0, 0.0)
        .client("CL1", 40.0, 3.0, 0.0)
        .client("CL2", 40.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 100.0, 500.0, 8.0))
        .build()
        .expect("valid instance");
    assert_eq!(
        reason(solve_exact(&instance)),
        InfeasibilityReason::CenterCapacity {
            demand: 80.0,
            capacity: 50.0,
        }
    );
}

#[rstest]
#[case::access(access_denied_records(), "CL2")]
#[case::range(short_range_records(), "CL1")]
fn unreachable_client_is_named(#[case] records: InstanceRecords, #[case] client: &str) {
    let instance = instance(records);
    assert_eq!(
        reason(solve_exact(&instance)),
        InfeasibilityReason::ClientUnreachable {
            client: NodeId::from(client),
        }
    );
}

#[rstest]
fn service_time_counts_against_duration() {
    let instance = RecordsBuilder::new()
        .center("CD1", 100.0, 0.0, 0.0)
        .client("CL1", 10.0, 3.0, 4.0)
        .service_time("CL1", 0.5)
        .vehicle(vehicle("V1", 50.0, 500.0, 0.6))
        .build()
        .expect("valid instance");
    assert_eq!(
        reason(solve_exact(&instance)),
        InfeasibilityReason::ClientUnreachable {
            client: NodeId::from("CL1"),
        }
    );
}

#[rstest]
fn combined_range_shortfall_has_no_assignment() {
    let instance = RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 40.0, 3.0, 0.0)
        .client("CL2", 40.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 100.0, 11.0, 8.0))
        .build()
        .expect("valid instance");
    assert_eq!(
        reason(solve_exact(&instance)),
        InfeasibilityReason::NoFeasibleAssignment
    );
}

#[rstest]
fn oversized_instances_are_refused() {
    let instance = instance(single_route_records());
    let solver = ExactSolver::with_config(ExactSolverConfig {
        max_clients: 1,
        ..ExactSolverConfig::default()
    });
    let result = solver.solve(&instance, &Formulation::build(&instance));
    assert_eq!(
        result,
        Err(SolveError::InstanceTooLarge {
            clients: 2,
            vehicles: 1,
            max_clients: 1,
            max_vehicles: 4,
        })
    );
}

#[rstest]
fn client_limit_is_clamped_to_ceiling() {
    let instance = instance(ring_records(CLIENT_CEILING + 1, 1));
    let solver = ExactSolver::with_config(ExactSolverConfig {
        max_clients: 64,
        ..ExactSolverConfig::default()
    });
    let result = solver.solve(&instance, &Formulation::build(&instance));
    assert!(matches!(
        result,
        Err(SolveError::InstanceTooLarge {
            max_clients: CLIENT_CEILING,
            ..
        })
    ));
}

#[rstest]
fn audit_can_be_disabled() {
    let instance = instance(single_route_records());
    let solver = ExactSolver::with_config(ExactSolverConfig {
        audit_formulation: false,
        ..ExactSolverConfig::default()
    });
    let solution = solve(&instance, &solver, &PlannerConfig::default()).expect("feasible");
    assert!(verify(&solution, &instance, 1e-6).is_ok());
}

#[rstest]
fn audit_rejects_a_mismatched_formulation() {
    let instance = instance(single_route_records());
    let result = ExactSolver::new().solve(&instance, &Formulation::default());
    assert!(matches!(
        result,
        Err(SolveError::FormulationMismatch { .. })
    ));
}
