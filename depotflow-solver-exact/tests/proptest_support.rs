//! Proptest strategies for exact solver property-based tests.
//!
//! Instances are small enough for exhaustive search and lie on a plane so
//! arcs can be generated by [`RecordsBuilder`]. Demands, capacities and
//! limits are drawn so that both feasible and infeasible cases occur.

use depotflow_core::InstanceRecords;
use depotflow_core::test_support::{RecordsBuilder, vehicle};
use proptest::prelude::*;

/// Planar point with integer-valued coordinates in `[-10, 10]`.
fn point_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-10_i32..=10, -10_i32..=10).prop_map(|(x, y)| (f64::from(x), f64::from(y)))
}

/// Raw vehicle parameters: capacity, range and maximum duration.
fn vehicle_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (
        prop_oneof![Just(40.0), Just(60.0), Just(100.0)],
        prop_oneof![Just(30.0), Just(60.0), Just(120.0)],
        prop_oneof![Just(1.0), Just(8.0)],
    )
}

/// Access denials as `(node, vehicle)` index pairs. Nodes index centers
/// first, then clients; pairs naming a missing node are dropped.
fn denial_strategy() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0_usize..7, 0_usize..3), 0..=3)
}

/// Strategy for instances with up to two centers, five clients and three
/// vehicles. Vehicles may be tied to a home center and barred from nodes.
pub fn instance_strategy() -> impl Strategy<Value = InstanceRecords> {
    (
        proptest::collection::vec((point_strategy(), 50.0_f64..200.0), 1..=2),
        proptest::collection::vec((point_strategy(), 5.0_f64..40.0), 0..=5),
        proptest::collection::vec(
            (vehicle_strategy(), proptest::option::of(0_usize..2)),
            1..=3,
        ),
        denial_strategy(),
    )
        .prop_map(|(centers, clients, vehicles, denials)| {
            let center_ids: Vec<String> =
                (1..=centers.len()).map(|index| format!("CD{index}")).collect();
            let node_ids: Vec<String> = center_ids
                .iter()
                .cloned()
                .chain((1..=clients.len()).map(|index| format!("CL{index}")))
                .collect();
            let vehicle_ids: Vec<String> =
                (1..=vehicles.len()).map(|index| format!("V{index}")).collect();

            let mut builder = RecordsBuilder::new();
            for (id, ((x, y), capacity)) in center_ids.iter().zip(centers) {
                builder = builder.center(id, capacity, x, y);
            }
            for (index, ((x, y), demand)) in clients.into_iter().enumerate() {
                builder = builder.client(&format!("CL{}", index + 1), demand, x, y);
            }
            for (id, ((capacity, range, t_max), home)) in vehicle_ids.iter().zip(vehicles) {
                let mut record = vehicle(id, capacity, range, t_max);
                record.home_center = home.and_then(|index| center_ids.get(index)).cloned();
                builder = builder.vehicle(record);
            }
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
