//! Solver output: one route per vehicle plus the objective.
//!
//! Every solver strategy returns the same [`Solution`] shape. Routes are
//! rebuilt from the instance so derived quantities (loads, distances,
//! costs) do not depend on which strategy produced them.

mod records;
mod route;

use std::collections::{BTreeMap, BTreeSet};

pub use records::{FLOW_EPSILON, FlowRecord, SelectedArcRecord};
pub use route::{ArcUsage, RouteError, VehicleRoute};

use crate::{CostBreakdown, Instance, NodeId, VehicleId};

/// Routes for the whole fleet.
///
/// Holds exactly one [`VehicleRoute`] per vehicle of the instance, ordered
/// by vehicle id; vehicles without work carry an idle route.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    routes: Vec<VehicleRoute>,
    objective: f64,
    strategy: String,
}

impl Solution {
    /// Assemble a solution from routes.
    ///
    /// Vehicles without a route receive an idle one. The objective is the
    /// sum of route costs.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownVehicle`] or
    /// [`RouteError::DuplicateVehicle`] when the routes do not match the
    /// fleet.
    pub fn new(
        instance: &Instance,
        routes: Vec<VehicleRoute>,
        strategy: impl Into<String>,
    ) -> Result<Self, RouteError> {
        let mut by_vehicle: BTreeMap<VehicleId, VehicleRoute> = BTreeMap::new();
        for route in routes {
            let vehicle = route.vehicle().clone();
            if instance.vehicle(vehicle.as_str()).is_none() {
                return Err(RouteError::UnknownVehicle { vehicle });
            }
            if by_vehicle.insert(vehicle.clone(), route).is_some() {
                return Err(RouteError::DuplicateVehicle { vehicle });
            }
        }
        let routes: Vec<VehicleRoute> = instance
            .vehicles()
            .map(|vehicle| {
                by_vehicle
                    .remove(&vehicle.id)
                    .unwrap_or_else(|| VehicleRoute::idle(vehicle.id.clone()))
            })
            .collect();
        let objective = routes.iter().map(|route| route.cost().total()).sum();
        Ok(Self {
            routes,
            objective,
            strategy: strategy.into(),
        })
    }

    /// Rebuild routes from selected `(vehicle, origin, destination)` arcs.
    ///
    /// Each vehicle's arcs must leave a center exactly once, give every node
    /// at most one successor and close into a single tour.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the selection does not describe one
    /// closed tour per dispatched vehicle.
    pub fn from_arc_selection<I>(
        instance: &Instance,
        selection: I,
        strategy: impl Into<String>,
    ) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (VehicleId, NodeId, NodeId)>,
    {
        let mut successors: BTreeMap<VehicleId, BTreeMap<NodeId, NodeId>> = BTreeMap::new();
        for (vehicle, origin, destination) in selection {
            let next = successors.entry(vehicle.clone()).or_default();
            if next.insert(origin.clone(), destination).is_some() {
                return Err(RouteError::Branching {
                    vehicle,
                    node: origin,
                });
            }
        }

        let mut routes = Vec::with_capacity(successors.len());
        for (vehicle, next) in successors {
            let departures: Vec<&NodeId> = next
                .keys()
                .filter(|node| instance.is_center(node.as_str()))
                .collect();
            let [center] = departures.as_slice() else {
                return Err(RouteError::Departures {
                    departures: departures.len(),
                    vehicle,
                });
            };
            let stops = follow_tour(&vehicle, center, &next)?;
            let depot = NodeId::clone(center);
            routes.push(VehicleRoute::build(instance, &vehicle, &depot, stops)?);
        }
        Self::new(instance, routes, strategy)
    }

    /// Routes ordered by vehicle id, idle ones included.
    #[must_use]
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    /// Route of one vehicle.
    #[must_use]
    pub fn route(&self, vehicle: &str) -> Option<&VehicleRoute> {
        self.routes
            .iter()
            .find(|route| route.vehicle().as_str() == vehicle)
    }

    /// Dispatched routes only.
    pub fn active_routes(&self) -> impl Iterator<Item = &VehicleRoute> {
        self.routes.iter().filter(|route| route.is_active())
    }

    /// Total cost of all routes.
    #[must_use]
    pub const fn objective(&self) -> f64 {
        self.objective
    }

    /// Name of the strategy that produced the solution.
    #[must_use]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Cost of the whole fleet split by component.
    #[must_use]
    pub fn cost(&self) -> CostBreakdown {
        self.routes.iter().map(VehicleRoute::cost).sum()
    }

    /// Demand dispatched from each center that launched a route.
    #[must_use]
    pub fn dispatched_by_center(&self) -> BTreeMap<&NodeId, f64> {
        let mut dispatched = BTreeMap::new();
        for route in self.active_routes() {
            if let Some(center) = route.center() {
                *dispatched.entry(center).or_insert(0.0) += route.demand();
            }
        }
        dispatched
    }

    /// Every traversed arc, by vehicle then route order.
    #[must_use]
    pub fn selected_arcs(&self) -> Vec<SelectedArcRecord> {
        self.routes
            .iter()
            .flat_map(|route| {
                route.arcs().iter().map(|usage| SelectedArcRecord {
                    vehicle: route.vehicle().clone(),
                    origin: usage.origin.clone(),
                    destination: usage.destination.clone(),
                    distance: usage.distance,
                    time: usage.time,
                    load: usage.load,
                })
            })
            .collect()
    }

    /// Arcs carrying a load above [`FLOW_EPSILON`].
    #[must_use]
    pub fn flows(&self) -> Vec<FlowRecord> {
        self.routes
            .iter()
            .flat_map(|route| {
                route
                    .arcs()
                    .iter()
                    .filter(|usage| usage.load > FLOW_EPSILON)
                    .map(|usage| FlowRecord {
                        vehicle: route.vehicle().clone(),
                        origin: usage.origin.clone(),
                        destination: usage.destination.clone(),
                        flow: usage.load,
                    })
            })
            .collect()
    }
}

fn follow_tour(
    vehicle: &VehicleId,
    center: &NodeId,
    next: &BTreeMap<NodeId, NodeId>,
) -> Result<Vec<NodeId>, RouteError> {
    let disconnected = || RouteError::Disconnected {
        vehicle: vehicle.clone(),
    };
    let mut stops = Vec::new();
    let mut seen = BTreeSet::new();
    let mut current = next.get(center).ok_or_else(disconnected)?;
    while current != center {
        if !seen.insert(current) {
            return Err(disconnected());
        }
        stops.push(current.clone());
        current = next.get(current).ok_or_else(disconnected)?;
    }
    if stops.len() + 1 != next.len() {
        return Err(disconnected());
    }
    Ok(stops)
}
