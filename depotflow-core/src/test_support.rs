//! Instance builders and canned scenarios shared by unit, behaviour and
//! property tests across the workspace.
//!
//! Coordinates passed to [`RecordsBuilder`] are planar `(x, y)` pairs; arcs
//! are generated for every ordered pair of distinct nodes using Euclidean
//! distance and a constant speed.

use crate::{
    AccessRecord, ArcRecord, CenterRecord, ClientRecord, DataIntegrityError, EconomicsRecord,
    Instance, InstanceRecords, VehicleRecord,
};

/// Fuel price used by [`RecordsBuilder::new`].
pub const FUEL_PRICE: f64 = 1.5;
/// Travel speed used by generated arcs.
pub const SPEED: f64 = 50.0;

/// Vehicle record with the default cost parameters used in tests.
///
/// `eff = 10`, `w_time = 10`, `c_km = 1`, `f_fixed = 50`.
#[must_use]
pub fn vehicle(id: &str, capacity: f64, range: f64, t_max: f64) -> VehicleRecord {
    VehicleRecord {
        id: id.to_owned(),
        capacity,
        range,
        eff: 10.0,
        w_time: 10.0,
        c_km: 1.0,
        f_fixed: 50.0,
        t_max,
        home_center: None,
    }
}

/// Fluent construction of [`InstanceRecords`] on a plane.
#[derive(Debug, Clone)]
pub struct RecordsBuilder {
    records: InstanceRecords,
    speed: f64,
}

impl Default for RecordsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordsBuilder {
    /// Start an empty instance with default economics and speed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: InstanceRecords {
                centers: Vec::new(),
                clients: Vec::new(),
                vehicles: Vec::new(),
                economics: EconomicsRecord {
                    fuel_price: FUEL_PRICE,
                    alpha: 1.0,
                },
                access: Vec::new(),
                arcs: Vec::new(),
            },
            speed: SPEED,
        }
    }

    /// Add a center at `(x, y)`.
    #[must_use]
    pub fn center(mut self, id: &str, capacity: f64, x: f64, y: f64) -> Self {
        self.records.centers.push(CenterRecord {
            id: id.to_owned(),
            capacity,
            latitude: y,
            longitude: x,
        });
        self
    }

    /// Add a client at `(x, y)`.
    #[must_use]
    pub fn client(mut self, id: &str, demand: f64, x: f64, y: f64) -> Self {
        self.records.clients.push(ClientRecord {
            id: id.to_owned(),
            demand,
            latitude: y,
            longitude: x,
            service_time: None,
        });
        self
    }

    /// Set the service time of an existing client.
    #[must_use]
    pub fn service_time(mut self, client: &str, hours: f64) -> Self {
        if let Some(record) = self.records.clients.iter_mut().find(|c| c.id == client) {
            record.service_time = Some(hours);
        }
        self
    }

    /// Add a vehicle record.
    #[must_use]
    pub fn vehicle(mut self, record: VehicleRecord) -> Self {
        self.records.vehicles.push(record);
        self
    }

    /// Deny `vehicle` access to `node`.
    #[must_use]
    pub fn deny(mut self, node: &str, vehicle: &str) -> Self {
        self.records.access.push(AccessRecord {
            node_id: node.to_owned(),
            vehicle_id: vehicle.to_owned(),
            allowed: false,
        });
        self
    }

    /// Override the economics record.
    #[must_use]
    pub const fn economics(mut self, fuel_price: f64, alpha: f64) -> Self {
        self.records.economics = EconomicsRecord { fuel_price, alpha };
        self
    }

    /// Override the speed used for generated arc times.
    #[must_use]
    pub const fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Finish the records, generating the complete arc set.
    #[must_use]
    pub fn records(mut self) -> InstanceRecords {
        let points: Vec<(String, f64, f64)> = self
            .records
            .centers
            .iter()
            .map(|c| (c.id.clone(), c.longitude, c.latitude))
            .chain(
                self.records
                    .clients
                    .iter()
                    .map(|c| (c.id.clone(), c.longitude, c.latitude)),
            )
            .collect();
        for (origin, ox, oy) in &points {
            for (destination, dx, dy) in &points {
                if origin == destination {
                    continue;
                }
                let distance = (dx - ox).hypot(dy - oy);
                self.records.arcs.push(ArcRecord {
                    origin: origin.clone(),
                    destination: destination.clone(),
                    distance,
                    time: distance / self.speed,
                });
            }
        }
        self.records
    }

    /// Finish and validate the instance.
    ///
    /// # Errors
    ///
    /// Propagates [`DataIntegrityError`] from [`Instance::from_records`].
    pub fn build(self) -> Result<Instance, DataIntegrityError> {
        Instance::from_records(self.records())
    }
}

/// One center, one vehicle and two clients that fit on a single route.
///
/// The optimal route is `CD1-CL1-CL2-CD1` with distance 12 and cost 66.2.
#[must_use]
pub fn single_route_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 40.0, 3.0, 0.0)
        .client("CL2", 40.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 100.0, 500.0, 8.0))
        .records()
}

/// Total demand of 120 against a single vehicle of capacity 100.
#[must_use]
pub fn over_capacity_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 60.0, 3.0, 0.0)
        .client("CL2", 60.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 100.0, 500.0, 8.0))
        .records()
}

/// `CL2` is denied to the only vehicle in the fleet.
#[must_use]
pub fn access_denied_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 40.0, 3.0, 0.0)
        .client("CL2", 40.0, 3.0, 4.0)
        .vehicle(vehicle("V1", 100.0, 500.0, 8.0))
        .deny("CL2", "V1")
        .records()
}

/// The round trip to `CL1` is 6 but the vehicle range is 5.
#[must_use]
pub fn short_range_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 40.0, 3.0, 0.0)
        .vehicle(vehicle("V1", 100.0, 5.0, 8.0))
        .records()
}

/// Two vehicles that must both be dispatched.
///
/// `V2` can only carry `CL2`, so the optimum assigns `CL1` (80) to `V1`
/// (capacity 100) and `CL2` (40) to `V2` (capacity 50). The center ships
/// 120 of its 200 units.
#[must_use]
pub fn two_vehicle_records() -> InstanceRecords {
    RecordsBuilder::new()
        .center("CD1", 200.0, 0.0, 0.0)
        .client("CL1", 80.0, 6.0, 0.0)
        .client("CL2", 40.0, -4.0, 3.0)
        .vehicle(vehicle("V1", 100.0, 500.0, 8.0))
        .vehicle(vehicle("V2", 50.0, 500.0, 8.0))
        .records()
}
