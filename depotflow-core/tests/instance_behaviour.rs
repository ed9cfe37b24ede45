#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for instance construction and validation.
//!
//! Scenarios start from a JSON mini case and mutate the raw records before
//! building the instance.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use depotflow_core::{
    AccessRecord, ArcRecord, DataIntegrityError, Instance, InstanceRecords,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

fn load_mini_case() -> InstanceRecords {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/mini_case.json");
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&content).expect("failed to parse mini case JSON")
}

#[derive(Debug, Default)]
struct InstanceWorld {
    records: RefCell<Option<InstanceRecords>>,
    result: RefCell<Option<Result<Instance, DataIntegrityError>>>,
}

impl InstanceWorld {
    fn edit(&self, f: impl FnOnce(&mut InstanceRecords)) {
        let mut records = self.records.borrow_mut();
        f(records.as_mut().expect("records loaded"));
    }

    fn error(&self) -> DataIntegrityError {
        self.result
            .borrow()
            .as_ref()
            .expect("instance built")
            .clone()
            .expect_err("construction should fail")
    }
}

#[fixture]
fn world() -> InstanceWorld {
    InstanceWorld::default()
}

#[given("the mini case records")]
fn mini_case(world: &InstanceWorld) {
    world.records.replace(Some(load_mini_case()));
}

#[given("vehicle {id} is listed twice")]
fn duplicate_vehicle(world: &InstanceWorld, id: String) {
    world.edit(|records| {
        let copy = records
            .vehicles
            .iter()
            .find(|vehicle| vehicle.id == id)
            .cloned()
            .expect("vehicle present");
        records.vehicles.push(copy);
    });
}

#[given("an arc from {origin} to {destination}")]
fn extra_arc(world: &InstanceWorld, origin: String, destination: String) {
    world.edit(|records| {
        records.arcs.push(ArcRecord {
            origin,
            destination,
            distance: 1.0,
            time: 0.1,
        });
    });
}

#[given("vehicle {id} has capacity {capacity:f64}")]
fn vehicle_capacity(world: &InstanceWorld, id: String, capacity: f64) {
    world.edit(|records| {
        for vehicle in records.vehicles.iter_mut().filter(|v| v.id == id) {
            vehicle.capacity = capacity;
        }
    });
}

#[given("an access rule denying {vehicle} at {node}")]
fn deny_access(world: &InstanceWorld, vehicle: String, node: String) {
    world.edit(|records| {
        records.access.push(AccessRecord {
            node_id: node,
            vehicle_id: vehicle,
            allowed: false,
        });
    });
}

#[when("the instance is built")]
fn build_instance(world: &InstanceWorld) {
    let records = world.records.borrow().clone().expect("records loaded");
    world.result.replace(Some(Instance::from_records(records)));
}

#[then("the instance has {clients:usize} clients and {vehicles:usize} vehicles")]
fn instance_sizes(world: &InstanceWorld, clients: usize, vehicles: usize) {
    let result = world.result.borrow();
    let instance = result
        .as_ref()
        .expect("instance built")
        .as_ref()
        .expect("construction should succeed");
    assert_eq!(instance.client_count(), clients);
    assert_eq!(instance.vehicle_count(), vehicles);
}

#[then("vehicle {vehicle} may not visit {node}")]
fn access_denied(world: &InstanceWorld, vehicle: String, node: String) {
    let result = world.result.borrow();
    let instance = result
        .as_ref()
        .expect("instance built")
        .as_ref()
        .expect("construction should succeed");
    assert!(!instance.is_allowed(&node, &vehicle));
}

#[then("client {client} has service time {hours:f64}")]
fn service_time(world: &InstanceWorld, client: String, hours: f64) {
    let result = world.result.borrow();
    let instance = result
        .as_ref()
        .expect("instance built")
        .as_ref()
        .expect("construction should succeed");
    let found = instance.client(&client).expect("client present");
    assert!((found.service_time - hours).abs() < 1e-12);
}

#[then("construction fails with a duplicate vehicle id")]
fn fails_duplicate(world: &InstanceWorld) {
    assert!(matches!(
        world.error(),
        DataIntegrityError::DuplicateId {
            entity: "vehicle",
            ..
        }
    ));
}

#[then("construction fails naming unknown node {node}")]
fn fails_unknown_node(world: &InstanceWorld, node: String) {
    match world.error() {
        DataIntegrityError::UnknownArcNode { node: found, .. } => assert_eq!(found, node),
        other => panic!("expected UnknownArcNode, found {other:?}"),
    }
}

#[then("construction fails because {field} is not positive")]
fn fails_non_positive(world: &InstanceWorld, field: String) {
    match world.error() {
        DataIntegrityError::NonPositive { field: found, .. } => assert_eq!(found, field),
        other => panic!("expected NonPositive, found {other:?}"),
    }
}

#[then("construction fails naming unknown vehicle {vehicle}")]
fn fails_unknown_vehicle(world: &InstanceWorld, vehicle: String) {
    match world.error() {
        DataIntegrityError::UnknownAccessVehicle { vehicle: found } => assert_eq!(found, vehicle),
        other => panic!("expected UnknownAccessVehicle, found {other:?}"),
    }
}

#[scenario(path = "tests/features/instance.feature", index = 0)]
fn well_formed_mini_case(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 1)]
fn duplicate_vehicle_ids(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 2)]
fn unknown_arc_node(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 3)]
fn zero_capacity_vehicle(world: InstanceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/instance.feature", index = 4)]
fn unknown_access_vehicle(world: InstanceWorld) {
    let _ = world;
}
