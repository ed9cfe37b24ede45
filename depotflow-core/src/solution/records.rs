//! Flat output rows derived from a [`Solution`](super::Solution).

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{NodeId, VehicleId};

/// Loads at or below this value are not reported as flows.
pub const FLOW_EPSILON: f64 = 1e-6;

/// One traversed arc of one vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SelectedArcRecord {
    /// Vehicle identifier.
    pub vehicle: VehicleId,
    /// Arc origin.
    pub origin: NodeId,
    /// Arc destination.
    pub destination: NodeId,
    /// Arc distance.
    pub distance: f64,
    /// Arc travel time in hours.
    pub time: f64,
    /// Load on board after leaving the origin.
    pub load: f64,
}

/// Positive load carried by a vehicle across an arc.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FlowRecord {
    /// Vehicle identifier.
    pub vehicle: VehicleId,
    /// Arc origin.
    pub origin: NodeId,
    /// Arc destination.
    pub destination: NodeId,
    /// Quantity carried.
    pub flow: f64,
}
