//! Checks every accepted [`Solution`] must pass.
//!
//! [`verify`] recomputes each property from the instance instead of
//! trusting the quantities cached on the routes, so a defective solver or
//! a solution paired with the wrong instance is caught.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Instance, NodeId, Solution, VehicleId, VehicleRoute};

/// A broken solution invariant.
///
/// These indicate a defect in a formulation or solver, never bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// The solution does not carry exactly one route per vehicle.
    #[error("solution routes do not match the fleet")]
    FleetMismatch,
    /// A client is never visited.
    #[error("client {client} is not visited")]
    ClientNotVisited {
        /// Client identifier.
        client: NodeId,
    },
    /// A client is visited more than once.
    #[error("client {client} is visited {visits} times")]
    ClientVisitedRepeatedly {
        /// Client identifier.
        client: NodeId,
        /// Number of visits.
        visits: usize,
    },
    /// A route's arcs do not chain from its center back to it.
    #[error("route of vehicle {vehicle} is not a closed tour from its center")]
    BrokenTour {
        /// Vehicle identifier.
        vehicle: VehicleId,
    },
    /// A route leaves from a center the vehicle may not use.
    #[error("vehicle {vehicle} may not operate from center {center}")]
    ForeignCenter {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Center used.
        center: NodeId,
    },
    /// A route traverses an arc missing from the catalog or with
    /// different attributes.
    #[error("vehicle {vehicle} uses arc {origin}->{destination} not in the catalog")]
    UnknownArc {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Arc origin.
        origin: NodeId,
        /// Arc destination.
        destination: NodeId,
    },
    /// A vehicle visits a node it is denied access to.
    #[error("vehicle {vehicle} may not access node {node}")]
    AccessDenied {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Node visited.
        node: NodeId,
    },
    /// Load on an arc exceeds the vehicle capacity.
    #[error("vehicle {vehicle} carries {load} on {origin}->{destination}, capacity {capacity}")]
    CapacityExceeded {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Arc origin.
        origin: NodeId,
        /// Arc destination.
        destination: NodeId,
        /// Load carried.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// Loads around a node do not differ by its demand.
    #[error("vehicle {vehicle}: flow is not conserved at {node}")]
    FlowNotConserved {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Node where inbound minus outbound load differs from demand.
        node: NodeId,
    },
    /// The route's distance exceeds the vehicle range.
    #[error("vehicle {vehicle} travels {distance}, range {range}")]
    RangeExceeded {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Distance travelled.
        distance: f64,
        /// Vehicle range.
        range: f64,
    },
    /// The route's duration exceeds the vehicle limit.
    #[error("vehicle {vehicle} works {duration} h, limit {limit} h")]
    DurationExceeded {
        /// Vehicle identifier.
        vehicle: VehicleId,
        /// Travel plus service time.
        duration: f64,
        /// Maximum route duration.
        limit: f64,
    },
    /// Demand dispatched from a center exceeds its capacity.
    #[error("center {center} dispatches {dispatched}, capacity {capacity}")]
    CenterCapacityExceeded {
        /// Center identifier.
        center: NodeId,
        /// Demand dispatched.
        dispatched: f64,
        /// Center capacity.
        capacity: f64,
    },
    /// Total dispatched supply does not cover total demand.
    #[error("dispatched supply {dispatched} does not match total demand {demand}")]
    SupplyMismatch {
        /// Sum of demand carried out of all centers.
        dispatched: f64,
        /// Sum of client demand.
        demand: f64,
    },
    /// The reported objective does not match the recomputed route costs.
    #[error("objective {reported} differs from recomputed cost {computed}")]
    ObjectiveMismatch {
        /// Objective carried by the solution.
        reported: f64,
        /// Sum of recomputed route costs.
        computed: f64,
    },
}

/// Check every solution invariant against `instance`.
///
/// Comparisons allow an absolute slack of `tolerance`; the objective is
/// compared relative to its magnitude.
///
/// # Errors
///
/// Returns the first [`InvariantViolation`] found.
pub fn verify(
    solution: &Solution,
    instance: &Instance,
    tolerance: f64,
) -> Result<(), InvariantViolation> {
    let routes = solution.routes();
    if routes.len() != instance.vehicle_count()
        || routes
            .iter()
            .zip(instance.vehicles())
            .any(|(route, vehicle)| *route.vehicle() != vehicle.id)
    {
        return Err(InvariantViolation::FleetMismatch);
    }

    let mut visits: BTreeMap<&NodeId, usize> = BTreeMap::new();
    let mut dispatched: BTreeMap<&NodeId, f64> = BTreeMap::new();
    let mut computed = 0.0;
    for route in routes {
        let Some(center) = route.center() else {
            if !route.arcs().is_empty() {
                return Err(InvariantViolation::BrokenTour {
                    vehicle: route.vehicle().clone(),
                });
            }
            continue;
        };
        computed += check_route(route, center, instance, tolerance)?;
        for stop in route.stops() {
            *visits.entry(stop).or_default() += 1;
        }
        *dispatched.entry(center).or_default() += route.demand();
    }

    for client in instance.clients() {
        match visits.remove(&client.id) {
            None => {
                return Err(InvariantViolation::ClientNotVisited {
                    client: client.id.clone(),
                });
            }
            Some(1) => {}
            Some(count) => {
                return Err(InvariantViolation::ClientVisitedRepeatedly {
                    client: client.id.clone(),
                    visits: count,
                });
            }
        }
    }

    let supplied: f64 = dispatched.values().sum();
    let demand = instance.total_demand();
    if (supplied - demand).abs() > tolerance {
        return Err(InvariantViolation::SupplyMismatch {
            dispatched: supplied,
            demand,
        });
    }

    for (center, amount) in dispatched {
        let capacity = instance
            .center(center.as_str())
            .map_or(0.0, |known| known.capacity);
        if amount > capacity + tolerance {
            return Err(InvariantViolation::CenterCapacityExceeded {
                center: center.clone(),
                dispatched: amount,
                capacity,
            });
        }
    }

    let reported = solution.objective();
    if (reported - computed).abs() > tolerance * computed.abs().max(1.0) {
        return Err(InvariantViolation::ObjectiveMismatch { reported, computed });
    }
    Ok(())
}

/// Check one dispatched route and return its recomputed cost.
fn check_route(
    route: &VehicleRoute,
    center: &NodeId,
    instance: &Instance,
    tolerance: f64,
) -> Result<f64, InvariantViolation> {
    let id = route.vehicle();
    let vehicle = instance
        .vehicle(id.as_str())
        .ok_or(InvariantViolation::FleetMismatch)?;
    if !instance
        .candidate_centers(vehicle)
        .any(|candidate| candidate.id == *center)
    {
        return Err(InvariantViolation::ForeignCenter {
            vehicle: id.clone(),
            center: center.clone(),
        });
    }

    let sequence = route.sequence();
    let arcs = route.arcs();
    if arcs.len() + 1 != sequence.len()
        || arcs
            .iter()
            .zip(sequence.windows(2))
            .any(|(usage, pair)| pair != [&usage.origin, &usage.destination])
    {
        return Err(InvariantViolation::BrokenTour {
            vehicle: id.clone(),
        });
    }

    let (mut distance, mut duration) = (0.0, 0.0);
    let mut cost = vehicle.fixed_cost;
    for (position, usage) in arcs.iter().enumerate() {
        let known = instance
            .arc(usage.origin.as_str(), usage.destination.as_str())
            .filter(|arc| arc.distance == usage.distance && arc.time == usage.time)
            .ok_or_else(|| InvariantViolation::UnknownArc {
                vehicle: id.clone(),
                origin: usage.origin.clone(),
                destination: usage.destination.clone(),
            })?;
        if !instance.is_allowed(usage.destination.as_str(), id.as_str()) {
            return Err(InvariantViolation::AccessDenied {
                vehicle: id.clone(),
                node: usage.destination.clone(),
            });
        }
        if usage.load > vehicle.capacity + tolerance || usage.load < -tolerance {
            return Err(InvariantViolation::CapacityExceeded {
                vehicle: id.clone(),
                origin: usage.origin.clone(),
                destination: usage.destination.clone(),
                load: usage.load,
                capacity: vehicle.capacity,
            });
        }

        let (demand, service) = instance
            .client(usage.destination.as_str())
            .map_or((0.0, 0.0), |client| (client.demand, client.service_time));
        let outbound = arcs.get(position + 1).map_or(0.0, |next| next.load);
        if (usage.load - outbound - demand).abs() > tolerance {
            return Err(InvariantViolation::FlowNotConserved {
                vehicle: id.clone(),
                node: usage.destination.clone(),
            });
        }

        distance += known.distance;
        duration += known.time + service;
        cost += crate::arc_cost(vehicle, known, instance.economics());
    }
    if arcs.first().is_some_and(|first| (first.load - route.demand()).abs() > tolerance) {
        return Err(InvariantViolation::FlowNotConserved {
            vehicle: id.clone(),
            node: center.clone(),
        });
    }

    if distance > vehicle.range + tolerance {
        return Err(InvariantViolation::RangeExceeded {
            vehicle: id.clone(),
            distance,
            range: vehicle.range,
        });
    }
    if duration > vehicle.max_duration + tolerance {
        return Err(InvariantViolation::DurationExceeded {
            vehicle: id.clone(),
            duration,
            limit: vehicle.max_duration,
        });
    }
    Ok(cost)
}
