//! A single vehicle's route and its derived quantities.

use thiserror::Error;

use crate::{CostBreakdown, Instance, NodeId, VehicleId};

/// Structural problems found while assembling routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The vehicle is not part of the instance.
    #[error("unknown vehicle {vehicle}")]
    UnknownVehicle {
        /// Vehicle identifier.
        vehicle: VehicleId,
    },
    /// The route starts at a node that is not a center.
    #[error("vehicle {vehicle}: {node} is not a center")]
    NotACenter {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Offending node.
        node: NodeId,
    },
    /// A stop is not a client of the instance.
    #[error("vehicle {vehicle}: {node} is not a client")]
    NotAClient {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Offending node.
        node: NodeId,
    },
    /// A client appears twice on the same route.
    #[error("vehicle {vehicle} visits {node} more than once")]
    RepeatedStop {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Repeated client.
        node: NodeId,
    },
    /// Consecutive nodes have no arc between them.
    #[error("vehicle {vehicle}: no arc {origin}->{destination}")]
    MissingArc {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Arc origin.
        origin: NodeId,
        /// Arc destination.
        destination: NodeId,
    },
    /// The vehicle appears in more than one route.
    #[error("vehicle {vehicle} has more than one route")]
    DuplicateVehicle {
        /// Vehicle identifier.
        vehicle: VehicleId,
    },
    /// Selected arcs do not leave a center exactly once.
    #[error("vehicle {vehicle}: selected arcs leave a center {departures} times")]
    Departures {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Number of arcs leaving a center.
        departures: usize,
    },
    /// Two selected arcs leave the same node.
    #[error("vehicle {vehicle}: more than one selected arc leaves {node}")]
    Branching {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Node with several successors.
        node: NodeId,
    },
    /// Selected arcs do not form one closed tour from the center.
    #[error("vehicle {vehicle}: selected arcs do not form a single closed tour")]
    Disconnected {
        /// Vehicle identifier.
        vehicle: VehicleId,
    },
}

/// One arc traversed by a route with the load carried across it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcUsage {
    /// Arc origin.
    pub origin: NodeId,
    /// Arc destination.
    pub destination: NodeId,
    /// Arc distance.
    pub distance: f64,
    /// Arc travel time in hours.
    pub time: f64,
    /// Demand on board after leaving `origin`.
    pub load: f64,
    /// Variable cost of the traversal.
    pub cost: CostBreakdown,
}

/// A vehicle's round trip, or an idle vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    vehicle: VehicleId,
    center: Option<NodeId>,
    stops: Vec<NodeId>,
    arcs: Vec<ArcUsage>,
    demand: f64,
    distance: f64,
    travel_time: f64,
    service_time: f64,
    cost: CostBreakdown,
}

impl VehicleRoute {
    /// A vehicle that is not dispatched.
    #[must_use]
    pub const fn idle(vehicle: VehicleId) -> Self {
        Self {
            vehicle,
            center: None,
            stops: Vec::new(),
            arcs: Vec::new(),
            demand: 0.0,
            distance: 0.0,
            travel_time: 0.0,
            service_time: 0.0,
            cost: CostBreakdown::ZERO,
        }
    }

    /// Build the round trip `center → stops… → center`.
    ///
    /// An empty `stops` list yields an idle route regardless of `center`.
    /// Loads are canonical: each arc carries the demand of every stop still
    /// ahead of it, so the return arc carries nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the vehicle, center or a stop is unknown,
    /// a stop repeats, or a leg has no arc in the catalog. Capacity, range,
    /// duration and access are not checked here; see
    /// [`verify`](crate::verify).
    pub fn build(
        instance: &Instance,
        vehicle: &VehicleId,
        center: &NodeId,
        stops: Vec<NodeId>,
    ) -> Result<Self, RouteError> {
        let fleet_vehicle =
            instance
                .vehicle(vehicle.as_str())
                .ok_or_else(|| RouteError::UnknownVehicle {
                    vehicle: vehicle.clone(),
                })?;
        if stops.is_empty() {
            return Ok(Self::idle(vehicle.clone()));
        }
        if !instance.is_center(center.as_str()) {
            return Err(RouteError::NotACenter {
                vehicle: vehicle.clone(),
                node: center.clone(),
            });
        }

        let mut demands = Vec::with_capacity(stops.len());
        let mut service_time = 0.0;
        for (position, stop) in stops.iter().enumerate() {
            let client = instance
                .client(stop.as_str())
                .ok_or_else(|| RouteError::NotAClient {
                    vehicle: vehicle.clone(),
                    node: stop.clone(),
                })?;
            if stops.iter().take(position).any(|earlier| earlier == stop) {
                return Err(RouteError::RepeatedStop {
                    vehicle: vehicle.clone(),
                    node: stop.clone(),
                });
            }
            demands.push(client.demand);
            service_time += client.service_time;
        }

        let sequence: Vec<&NodeId> = std::iter::once(center)
            .chain(stops.iter())
            .chain(std::iter::once(center))
            .collect();
        let mut arcs = Vec::with_capacity(stops.len() + 1);
        let mut cost = CostBreakdown::fixed(fleet_vehicle.fixed_cost);
        let (mut distance, mut travel_time) = (0.0, 0.0);
        for (leg, pair) in sequence.windows(2).enumerate() {
            let [origin, destination] = pair else {
                continue;
            };
            let arc = instance
                .arc(origin.as_str(), destination.as_str())
                .ok_or_else(|| RouteError::MissingArc {
                    vehicle: vehicle.clone(),
                    origin: (*origin).clone(),
                    destination: (*destination).clone(),
                })?;
            let arc_cost = CostBreakdown::for_arc(fleet_vehicle, arc, instance.economics());
            cost += arc_cost;
            distance += arc.distance;
            travel_time += arc.time;
            arcs.push(ArcUsage {
                origin: arc.origin.clone(),
                destination: arc.destination.clone(),
                distance: arc.distance,
                time: arc.time,
                load: demands.iter().skip(leg).fold(0.0, |total, d| total + d),
                cost: arc_cost,
            });
        }

        Ok(Self {
            vehicle: vehicle.clone(),
            center: Some(center.clone()),
            demand: demands.iter().sum(),
            stops,
            arcs,
            distance,
            travel_time,
            service_time,
            cost,
        })
    }

    /// Vehicle driving the route.
    #[must_use]
    pub const fn vehicle(&self) -> &VehicleId {
        &self.vehicle
    }

    /// Center the route starts and ends at; `None` when idle.
    #[must_use]
    pub const fn center(&self) -> Option<&NodeId> {
        self.center.as_ref()
    }

    /// Clients in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    /// Traversed arcs in order.
    #[must_use]
    pub fn arcs(&self) -> &[ArcUsage] {
        &self.arcs
    }

    /// Whether the vehicle is dispatched.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.center.is_some()
    }

    /// Total demand delivered, equal to the load leaving the center.
    #[must_use]
    pub const fn demand(&self) -> f64 {
        self.demand
    }

    /// Total distance travelled.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Total travel time in hours, excluding service.
    #[must_use]
    pub const fn travel_time(&self) -> f64 {
        self.travel_time
    }

    /// Total service time in hours.
    #[must_use]
    pub const fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Travel plus service time in hours.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.travel_time + self.service_time
    }

    /// Cost split by component.
    #[must_use]
    pub const fn cost(&self) -> CostBreakdown {
        self.cost
    }

    /// Full node sequence including the center at both ends.
    #[must_use]
    pub fn sequence(&self) -> Vec<&NodeId> {
        match &self.center {
            Some(center) => std::iter::once(center)
                .chain(self.stops.iter())
                .chain(std::iter::once(center))
                .collect(),
            None => Vec::new(),
        }
    }
}
