//! Proptest strategies for cross-validating the MILP adapter.
//!
//! Instances stay small so a pure-Rust branch and bound finishes quickly.
//! They still exercise service times, home centers and access denials.

use depotflow_core::InstanceRecords;
use depotflow_core::test_support::{RecordsBuilder, vehicle};
use proptest::prelude::*;

/// Planar point with integer-valued coordinates in `[-8, 8]`.
fn point_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-8_i32..=8, -8_i32..=8).prop_map(|(x, y)| (f64::from(x), f64::from(y)))
}

/// Client location, demand and optional service time in hours.
fn client_strategy() -> impl Strategy<Value = ((f64, f64), f64, Option<f64>)> {
    (
        point_strategy(),
        prop_oneof![Just(10.0), Just(20.0), Just(35.0)],
        proptest::option::of(prop_oneof![Just(0.25), Just(1.0)]),
    )
}

/// Vehicle capacity, range, duration limit and optional home center index.
fn vehicle_strategy() -> impl Strategy<Value = (f64, f64, f64, Option<usize>)> {
    (
        prop_oneof![Just(40.0), Just(80.0)],
        prop_oneof![Just(30.0), Just(80.0)],
        prop_oneof![Just(1.5), Just(8.0)],
        proptest::option::of(0_usize..2),
    )
}

/// Strategy for instances with up to two centers, four clients and two
/// vehicles.
pub fn small_instance_strategy() -> impl Strategy<Value = InstanceRecords> {
    (
        proptest::collection::vec(point_strategy(), 1..=2),
        proptest::collection::vec(client_strategy(), 1..=4),
        proptest::collection::vec(vehicle_strategy(), 1..=2),
        proptest::collection::vec((0_usize..6, 0_usize..2), 0..=2),
    )
        .prop_map(|(centers, clients, vehicles, denials)| {
            let center_ids: Vec<String> =
                (1..=centers.len()).map(|index| format!("CD{index}")).collect();
            let client_ids: Vec<String> =
                (1..=clients.len()).map(|index| format!("CL{index}")).collect();
            let vehicle_ids: Vec<String> =
                (1..=vehicles.len()).map(|index| format!("V{index}")).collect();

            let mut builder = RecordsBuilder::new();
            for (id, (x, y)) in center_ids.iter().zip(centers) {
                builder = builder.center(id, 100.0, x, y);
            }
            for (id, ((x, y), demand, service)) in client_ids.iter().zip(clients) {
                builder = builder.client(id, demand, x, y);
                if let Some(hours) = service {
                    builder = builder.service_time(id, hours);
                }
            }
            for (id, (capacity, range, t_max, home)) in vehicle_ids.iter().zip(vehicles) {
                let mut record = vehicle(id, capacity, range, t_max);
                record.home_center = home.and_then(|index| center_ids.get(index)).cloned();
                builder = builder.vehicle(record);
            }
            let node_ids: Vec<&String> = center_ids.iter().chain(&client_ids).collect();
            for (node_index, vehicle_index) in denials {
                if let (Some(node), Some(vehicle_id)) =
                    (node_ids.get(node_index), vehicle_ids.get(vehicle_index))
                {
                    builder = builder.deny(node, vehicle_id);
                }
            }
            builder.records()
        })
}
