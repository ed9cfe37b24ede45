#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for end-to-end planning with the exact solver.
//!
//! Each scenario builds one of the shared fixture instances, solves it
//! through the verified `solve` entry point and checks either the plan, the
//! diagnosed infeasibility or the extracted KPIs.

use std::cell::RefCell;

use depotflow_core::test_support::{
    access_denied_records, over_capacity_records, short_range_records, single_route_records,
    two_vehicle_records,
};
use depotflow_core::{
    Error, InfeasibilityReason, Instance, InstanceRecords, KpiReport, NodeId, PlannerConfig,
    Solution, SolveError, extract_kpis, solve, verify,
};
use depotflow_solver_exact::ExactSolver;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const TOLERANCE: f64 = 1e-9;

#[derive(Default)]
struct PlanningWorld {
    instance: RefCell<Option<Instance>>,
    result: RefCell<Option<Result<Solution, Error>>>,
    report: RefCell<Option<KpiReport>>,
}

impl PlanningWorld {
    fn load(&self, records: InstanceRecords) {
        let instance = Instance::from_records(records).expect("valid instance");
        self.instance.replace(Some(instance));
    }

    fn solution(&self) -> Solution {
        self.result
            .borrow()
            .as_ref()
            .expect("planning ran")
            .clone()
            .expect("planning should succeed")
    }

    fn reason(&self) -> InfeasibilityReason {
        let result = self.result.borrow();
        match result.as_ref().expect("planning ran") {
            Err(SolveError::Infeasible { reason }) => reason.clone(),
            other => panic!("expected infeasibility, found {other:?}"),
        }
    }
}

#[fixture]
fn world() -> PlanningWorld {
    PlanningWorld::default()
}

#[given("the single route case")]
fn single_route(world: &PlanningWorld) {
    world.load(single_route_records());
}

#[given("the over capacity case")]
fn over_capacity(world: &PlanningWorld) {
    world.load(over_capacity_records());
}

#[given("the access denied case")]
fn access_denied(world: &PlanningWorld) {
    world.load(access_denied_records());
}

#[given("the short range case")]
fn short_range(world: &PlanningWorld) {
    world.load(short_range_records());
}

#[given("the two vehicle case")]
fn two_vehicles(world: &PlanningWorld) {
    world.load(two_vehicle_records());
}

#[when("the exact solver plans the fleet")]
fn plan(world: &PlanningWorld) {
    let loaded = world.instance.borrow();
    let instance = loaded.as_ref().expect("instance loaded");
    let result = solve(instance, &ExactSolver::new(), &PlannerConfig::default());
    world.result.replace(Some(result));
}

#[when("KPIs are extracted")]
fn extract(world: &PlanningWorld) {
    let solution = world.solution();
    let loaded = world.instance.borrow();
    let instance = loaded.as_ref().expect("instance loaded");
    let report =
        extract_kpis(&solution, instance, &PlannerConfig::default()).expect("valid solution");
    world.report.replace(Some(report));
}

#[then("vehicle {vehicle} follows {sequence}")]
fn follows(world: &PlanningWorld, vehicle: String, sequence: String) {
    let solution = world.solution();
    let route = solution.route(&vehicle).expect("route for vehicle");
    let found: Vec<&str> = route.sequence().iter().map(|node| node.as_str()).collect();
    assert_eq!(found.join("-"), sequence);
}

#[then("the total cost is {cost:f64}")]
fn total_cost(world: &PlanningWorld, cost: f64) {
    assert!((world.solution().objective() - cost).abs() < TOLERANCE);
}

#[then("the solution satisfies every invariant")]
fn invariants_hold(world: &PlanningWorld) {
    let loaded = world.instance.borrow();
    let instance = loaded.as_ref().expect("instance loaded");
    assert_eq!(verify(&world.solution(), instance, 1e-6), Ok(()));
}

#[then("planning fails because demand {demand:f64} exceeds fleet capacity {capacity:f64}")]
fn fleet_shortfall(world: &PlanningWorld, demand: f64, capacity: f64) {
    assert_eq!(
        world.reason(),
        InfeasibilityReason::FleetCapacity { demand, capacity }
    );
}

#[then("planning fails because client {client} is unreachable")]
fn unreachable(world: &PlanningWorld, client: String) {
    assert_eq!(
        world.reason(),
        InfeasibilityReason::ClientUnreachable {
            client: NodeId::from(client),
        }
    );
}

#[then("vehicle {vehicle} has utilization {value:f64}")]
fn vehicle_utilization(world: &PlanningWorld, vehicle: String, value: f64) {
    let report = world.report.borrow();
    let kpi = report
        .as_ref()
        .expect("KPIs extracted")
        .vehicle(&vehicle)
        .expect("vehicle KPI");
    assert!((kpi.utilization - value).abs() < TOLERANCE);
}

#[then("center {center} has capacity utilization {value:f64}")]
fn center_utilization(world: &PlanningWorld, center: String, value: f64) {
    let report = world.report.borrow();
    let kpi = report
        .as_ref()
        .expect("KPIs extracted")
        .center(&center)
        .expect("center KPI");
    assert!((kpi.capacity_utilization - value).abs() < TOLERANCE);
}

#[then("center {center} launched {count:usize} vehicles")]
fn center_launches(world: &PlanningWorld, center: String, count: usize) {
    let report = world.report.borrow();
    let kpi = report
        .as_ref()
        .expect("KPIs extracted")
        .center(&center)
        .expect("center KPI");
    assert_eq!(kpi.vehicles_launched, count);
}

#[scenario(path = "tests/features/scenarios.feature", index = 0)]
fn single_route_plan(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 1)]
fn fleet_capacity_infeasible(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 2)]
fn access_infeasible(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 3)]
fn range_infeasible(world: PlanningWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/scenarios.feature", index = 4)]
fn two_vehicle_kpis(world: PlanningWorld) {
    let _ = world;
}
