//! Raw input records, one struct per input table.
//!
//! Field names follow the tabular column names; reading the tables from
//! disk is left to the caller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row of the `centers` table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CenterRecord {
    /// Center identifier.
    pub id: String,
    /// Throughput capacity.
    pub capacity: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Row of the `clients` table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClientRecord {
    /// Client identifier.
    pub id: String,
    /// Demand quantity.
    pub demand: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Optional service hours at the client.
    #[cfg_attr(feature = "serde", serde(default))]
    pub service_time: Option<f64>,
}

/// Row of the `vehicles` table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleRecord {
    /// Vehicle identifier.
    pub id: String,
    /// Capacity `Q`.
    #[cfg_attr(feature = "serde", serde(rename = "Q"))]
    pub capacity: f64,
    /// Range `R`.
    #[cfg_attr(feature = "serde", serde(rename = "R"))]
    pub range: f64,
    /// Fuel efficiency (distance per volume).
    pub eff: f64,
    /// Cost per hour.
    pub w_time: f64,
    /// Cost per distance unit.
    pub c_km: f64,
    /// Fixed dispatch cost.
    pub f_fixed: f64,
    /// Maximum route duration in hours.
    #[cfg_attr(feature = "serde", serde(rename = "Tmax"))]
    pub t_max: f64,
    /// Optional fixed home center.
    #[cfg_attr(feature = "serde", serde(default))]
    pub home_center: Option<String>,
}

/// The single row of the `economics` table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EconomicsRecord {
    /// Price per unit of fuel volume.
    pub fuel_price: f64,
    /// Fuel consumption scaling factor.
    pub alpha: f64,
}

/// Row of the `access` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessRecord {
    /// Node the rule applies to.
    pub node_id: String,
    /// Vehicle the rule applies to.
    pub vehicle_id: String,
    /// Whether the vehicle may visit the node.
    pub allowed: bool,
}

/// Row of the precomputed `arcs` table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcRecord {
    /// Origin node.
    pub origin: String,
    /// Destination node.
    pub destination: String,
    /// Travel distance.
    pub distance: f64,
    /// Travel time in hours.
    pub time: f64,
}

/// Every input table for one planning run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceRecords {
    /// Distribution centers.
    pub centers: Vec<CenterRecord>,
    /// Clients to serve.
    pub clients: Vec<ClientRecord>,
    /// Available fleet.
    pub vehicles: Vec<VehicleRecord>,
    /// Fuel economics.
    pub economics: EconomicsRecord,
    /// Access restrictions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub access: Vec<AccessRecord>,
    /// Precomputed arc catalog.
    pub arcs: Vec<ArcRecord>,
}
