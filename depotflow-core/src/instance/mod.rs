//! Validated problem data for one planning run.
//!
//! [`Instance::from_records`] is the only way to build an instance. It
//! rejects structurally invalid input with a [`DataIntegrityError`] before
//! any model is constructed. A built instance is immutable.

mod error;
mod records;

use std::collections::BTreeMap;

use geo::Coord;

pub use error::DataIntegrityError;
pub use records::{
    AccessRecord, ArcRecord, CenterRecord, ClientRecord, EconomicsRecord, InstanceRecords,
    VehicleRecord,
};

use crate::{
    AccessRule, AccessRules, Arc, ArcCatalog, Center, Client, Economics, Node, NodeId, Vehicle,
    VehicleId,
};

/// Centers, clients, fleet, economics, access rules and arcs.
///
/// # Examples
/// ```
/// use depotflow_core::{
///     ArcRecord, CenterRecord, ClientRecord, EconomicsRecord, Instance, InstanceRecords,
///     VehicleRecord,
/// };
///
/// # fn main() -> Result<(), depotflow_core::DataIntegrityError> {
/// let records = InstanceRecords {
///     centers: vec![CenterRecord { id: "CD1".into(), capacity: 100.0, latitude: 0.0, longitude: 0.0 }],
///     clients: vec![ClientRecord {
///         id: "CL1".into(), demand: 10.0, latitude: 0.0, longitude: 0.1, service_time: None,
///     }],
///     vehicles: vec![VehicleRecord {
///         id: "V1".into(), capacity: 50.0, range: 100.0, eff: 8.0, w_time: 10.0,
///         c_km: 0.5, f_fixed: 20.0, t_max: 8.0, home_center: None,
///     }],
///     economics: EconomicsRecord { fuel_price: 1.2, alpha: 1.0 },
///     access: Vec::new(),
///     arcs: vec![
///         ArcRecord { origin: "CD1".into(), destination: "CL1".into(), distance: 11.0, time: 0.2 },
///         ArcRecord { origin: "CL1".into(), destination: "CD1".into(), distance: 11.0, time: 0.2 },
///     ],
/// };
/// let instance = Instance::from_records(records)?;
/// assert!(instance.arc("CD1", "CL1").is_some());
/// assert!(instance.is_allowed("CL1", "V1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    centers: BTreeMap<NodeId, Center>,
    clients: BTreeMap<NodeId, Client>,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    economics: Economics,
    access: AccessRules,
    arcs: ArcCatalog,
}

impl Instance {
    /// Validate raw records and build an instance.
    ///
    /// # Errors
    ///
    /// Returns [`DataIntegrityError`] for duplicate ids, non-positive
    /// required fields, arcs or access rules naming unknown entities, and
    /// the other structural defects listed on the error type.
    pub fn from_records(records: InstanceRecords) -> Result<Self, DataIntegrityError> {
        let InstanceRecords {
            centers,
            clients,
            vehicles,
            economics,
            access,
            arcs,
        } = records;

        let centers = build_centers(centers)?;
        let clients = build_clients(clients, &centers)?;
        let vehicles = build_vehicles(vehicles, &centers)?;
        let economics = build_economics(economics)?;

        let mut instance = Self {
            centers,
            clients,
            vehicles,
            economics,
            access: AccessRules::default(),
            arcs: ArcCatalog::default(),
        };
        instance.access = instance.build_access(access)?;
        instance.arcs = instance.build_arcs(arcs)?;

        log::debug!(
            "instance built: {} centers, {} clients, {} vehicles, {} arcs, {} access denials",
            instance.centers.len(),
            instance.clients.len(),
            instance.vehicles.len(),
            instance.arcs.len(),
            instance.access.denied_count()
        );
        Ok(instance)
    }

    fn build_access(&self, records: Vec<AccessRecord>) -> Result<AccessRules, DataIntegrityError> {
        let mut rules = AccessRules::default();
        for record in records {
            if self.node(&record.node_id).is_none() {
                return Err(DataIntegrityError::UnknownAccessNode {
                    node: record.node_id,
                });
            }
            if !self.vehicles.contains_key(record.vehicle_id.as_str()) {
                return Err(DataIntegrityError::UnknownAccessVehicle {
                    vehicle: record.vehicle_id,
                });
            }
            let rule = AccessRule {
                node: NodeId::new(record.node_id.clone()),
                vehicle: VehicleId::new(record.vehicle_id.clone()),
                allowed: record.allowed,
            };
            if let Some(previous) = rules.insert(rule)
                && previous != record.allowed
            {
                return Err(DataIntegrityError::ConflictingAccessRule {
                    node: record.node_id,
                    vehicle: record.vehicle_id,
                });
            }
        }
        Ok(rules)
    }

    fn build_arcs(&self, records: Vec<ArcRecord>) -> Result<ArcCatalog, DataIntegrityError> {
        let mut catalog = ArcCatalog::default();
        for record in records {
            for node in [&record.origin, &record.destination] {
                if self.node(node).is_none() {
                    return Err(DataIntegrityError::UnknownArcNode {
                        origin: record.origin.clone(),
                        destination: record.destination.clone(),
                        node: node.clone(),
                    });
                }
            }
            if record.origin == record.destination {
                return Err(DataIntegrityError::SelfArc {
                    node: record.origin,
                });
            }
            let label = format!("{}->{}", record.origin, record.destination);
            require_non_negative("arc", &label, "distance", record.distance)?;
            require_non_negative("arc", &label, "time", record.time)?;

            let arc = Arc {
                origin: NodeId::new(record.origin),
                destination: NodeId::new(record.destination),
                distance: record.distance,
                time: record.time,
            };
            if let Some(previous) = catalog.insert(arc) {
                return Err(DataIntegrityError::DuplicateArc {
                    origin: previous.origin.to_string(),
                    destination: previous.destination.to_string(),
                });
            }
        }
        Ok(catalog)
    }

    /// Distribution centers in id order.
    pub fn centers(&self) -> impl Iterator<Item = &Center> {
        self.centers.values()
    }

    /// Clients in id order.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Vehicles in id order.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Number of clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Number of vehicles.
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Look up a center.
    #[must_use]
    pub fn center(&self, id: &str) -> Option<&Center> {
        self.centers.get(id)
    }

    /// Look up a client.
    #[must_use]
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Look up any node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<Node<'_>> {
        self.centers
            .get(id)
            .map(Node::Center)
            .or_else(|| self.clients.get(id).map(Node::Client))
    }

    /// Whether `id` names a center.
    #[must_use]
    pub fn is_center(&self, id: &str) -> bool {
        self.centers.contains_key(id)
    }

    /// Look up a vehicle.
    #[must_use]
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    /// Look up the arc from `origin` to `destination`.
    #[must_use]
    pub fn arc(&self, origin: &str, destination: &str) -> Option<&Arc> {
        self.arcs.get(origin, destination)
    }

    /// The arc catalog.
    #[must_use]
    pub const fn arcs(&self) -> &ArcCatalog {
        &self.arcs
    }

    /// Fleet-wide fuel economics.
    #[must_use]
    pub const fn economics(&self) -> &Economics {
        &self.economics
    }

    /// Whether `vehicle` may visit `node`.
    #[must_use]
    pub fn is_allowed(&self, node: &str, vehicle: &str) -> bool {
        self.access.is_allowed(node, vehicle)
    }

    /// Centers `vehicle` may launch a route from.
    ///
    /// A vehicle with a home center may only use that center, and only if
    /// access to it is allowed; otherwise every accessible center qualifies.
    pub fn candidate_centers<'a>(
        &'a self,
        vehicle: &'a Vehicle,
    ) -> impl Iterator<Item = &'a Center> + 'a {
        self.centers.values().filter(move |center| {
            vehicle
                .home_center
                .as_ref()
                .is_none_or(|home| *home == center.id)
                && self.is_allowed(center.id.as_str(), vehicle.id.as_str())
        })
    }

    /// Sum of all client demand.
    #[must_use]
    pub fn total_demand(&self) -> f64 {
        self.clients.values().map(|client| client.demand).sum()
    }

    /// Sum of all vehicle capacities.
    #[must_use]
    pub fn fleet_capacity(&self) -> f64 {
        self.vehicles.values().map(|vehicle| vehicle.capacity).sum()
    }

    /// Sum of all center capacities.
    #[must_use]
    pub fn center_capacity(&self) -> f64 {
        self.centers.values().map(|center| center.capacity).sum()
    }
}

fn location(latitude: f64, longitude: f64) -> Coord<f64> {
    Coord {
        x: longitude,
        y: latitude,
    }
}

fn require_positive(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), DataIntegrityError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DataIntegrityError::NonPositive {
            entity,
            id: id.to_owned(),
            field,
            value,
        })
    }
}

fn require_non_negative(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), DataIntegrityError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DataIntegrityError::Negative {
            entity,
            id: id.to_owned(),
            field,
            value,
        })
    }
}

fn build_centers(
    records: Vec<CenterRecord>,
) -> Result<BTreeMap<NodeId, Center>, DataIntegrityError> {
    let mut centers = BTreeMap::new();
    for record in records {
        require_non_negative("center", &record.id, "capacity", record.capacity)?;
        let id = NodeId::new(record.id);
        if centers.contains_key(&id) {
            return Err(DataIntegrityError::DuplicateId {
                entity: "center",
                id: id.to_string(),
            });
        }
        let center = Center {
            id: id.clone(),
            capacity: record.capacity,
            location: location(record.latitude, record.longitude),
        };
        centers.insert(id, center);
    }
    Ok(centers)
}

fn build_clients(
    records: Vec<ClientRecord>,
    centers: &BTreeMap<NodeId, Center>,
) -> Result<BTreeMap<NodeId, Client>, DataIntegrityError> {
    let mut clients = BTreeMap::new();
    for record in records {
        require_positive("client", &record.id, "demand", record.demand)?;
        let service_time = record.service_time.unwrap_or(0.0);
        require_non_negative("client", &record.id, "service_time", service_time)?;
        let id = NodeId::new(record.id);
        if centers.contains_key(&id) {
            return Err(DataIntegrityError::SharedNodeId { id: id.to_string() });
        }
        if clients.contains_key(&id) {
            return Err(DataIntegrityError::DuplicateId {
                entity: "client",
                id: id.to_string(),
            });
        }
        let client = Client {
            id: id.clone(),
            demand: record.demand,
            location: location(record.latitude, record.longitude),
            service_time,
        };
        clients.insert(id, client);
    }
    Ok(clients)
}

fn build_vehicles(
    records: Vec<VehicleRecord>,
    centers: &BTreeMap<NodeId, Center>,
) -> Result<BTreeMap<VehicleId, Vehicle>, DataIntegrityError> {
    let mut vehicles = BTreeMap::new();
    for record in records {
        let label = record.id.as_str();
        require_positive("vehicle", label, "Q", record.capacity)?;
        require_positive("vehicle", label, "R", record.range)?;
        require_positive("vehicle", label, "eff", record.eff)?;
        require_positive("vehicle", label, "Tmax", record.t_max)?;
        require_non_negative("vehicle", label, "w_time", record.w_time)?;
        require_non_negative("vehicle", label, "c_km", record.c_km)?;
        require_non_negative("vehicle", label, "f_fixed", record.f_fixed)?;

        let home_center = match record.home_center {
            Some(center) if !centers.contains_key(center.as_str()) => {
                return Err(DataIntegrityError::UnknownHomeCenter {
                    vehicle: record.id,
                    center,
                });
            }
            other => other.map(NodeId::new),
        };

        let id = VehicleId::new(record.id);
        if vehicles.contains_key(&id) {
            return Err(DataIntegrityError::DuplicateId {
                entity: "vehicle",
                id: id.to_string(),
            });
        }
        let vehicle = Vehicle {
            id: id.clone(),
            capacity: record.capacity,
            range: record.range,
            fuel_efficiency: record.eff,
            time_cost: record.w_time,
            distance_cost: record.c_km,
            fixed_cost: record.f_fixed,
            max_duration: record.t_max,
            home_center,
        };
        vehicles.insert(id, vehicle);
    }
    Ok(vehicles)
}

fn build_economics(record: EconomicsRecord) -> Result<Economics, DataIntegrityError> {
    require_positive("economics", "global", "fuel_price", record.fuel_price)?;
    require_positive("economics", "global", "alpha", record.alpha)?;
    Ok(Economics {
        fuel_price: record.fuel_price,
        alpha: record.alpha,
    })
}
