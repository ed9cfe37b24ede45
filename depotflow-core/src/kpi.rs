//! Per-vehicle and per-center indicators derived from a [`Solution`].
//!
//! Every function here is a pure reduction of its inputs: the same
//! solution, instance and configuration always yield identical records.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Instance, InvariantViolation, NodeId, PlannerConfig, Solution, VehicleId, verify};

/// Indicators for one vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VehicleKpi {
    /// Vehicle identifier.
    pub vehicle: VehicleId,
    /// Center the vehicle was launched from, if dispatched.
    pub center: Option<NodeId>,
    /// Number of clients visited.
    pub clients_served: usize,
    /// Demand delivered.
    pub demand_served: f64,
    /// Distance travelled.
    pub total_distance: f64,
    /// Travel plus service hours.
    pub total_time: f64,
    /// `w_time · travel time`.
    pub time_cost: f64,
    /// `c_km · distance`.
    pub distance_cost: f64,
    /// Fuel cost.
    pub fuel_cost: f64,
    /// Dispatch cost.
    pub fixed_cost: f64,
    /// Sum of all cost components.
    pub total_cost: f64,
    /// Fuel volume consumed.
    pub fuel_volume: f64,
    /// `demand_served / Q`.
    pub utilization: f64,
    /// `total_distance / R`.
    pub range_utilization: f64,
}

/// Indicators for one center.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CenterKpi {
    /// Center identifier.
    pub center: NodeId,
    /// Demand dispatched from the center.
    pub demand_dispatched: f64,
    /// Center capacity.
    pub capacity: f64,
    /// `demand_dispatched / capacity`; zero for a zero-capacity center.
    pub capacity_utilization: f64,
    /// Number of vehicles launched from the center.
    pub vehicles_launched: usize,
}

/// Center and vehicle indicators of one solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct KpiReport {
    /// One record per center, in id order.
    pub centers: Vec<CenterKpi>,
    /// One record per vehicle, in id order.
    pub vehicles: Vec<VehicleKpi>,
    /// Objective of the solution.
    pub total_cost: f64,
}

impl KpiReport {
    /// Record of one vehicle.
    #[must_use]
    pub fn vehicle(&self, id: &str) -> Option<&VehicleKpi> {
        self.vehicles.iter().find(|kpi| kpi.vehicle.as_str() == id)
    }

    /// Record of one center.
    #[must_use]
    pub fn center(&self, id: &str) -> Option<&CenterKpi> {
        self.centers.iter().find(|kpi| kpi.center.as_str() == id)
    }
}

/// Verification row for one dispatched vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RouteSummary {
    /// Vehicle identifier.
    pub vehicle: VehicleId,
    /// Center the route starts and ends at.
    pub center: NodeId,
    /// Load on board when leaving the center.
    pub initial_load: f64,
    /// Node sequence joined by `-`, e.g. `CD1-CL2-CL1-CD1`.
    pub route_sequence: String,
    /// Clients in visiting order.
    pub clients_served: Vec<NodeId>,
    /// Demand delivered at each client, in visiting order.
    pub demands_satisfied: Vec<f64>,
    /// Arrival clock time at each client as `HH:MM`.
    pub arrival_times: Vec<String>,
    /// Distance travelled.
    pub total_distance: f64,
    /// Travel plus service hours.
    pub total_time: f64,
    /// Route cost.
    pub total_cost: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Reduce a solution to center and vehicle indicators.
///
/// When [`PlannerConfig::verify_invariants`] is set the solution is checked
/// first.
///
/// # Errors
///
/// Returns [`InvariantViolation`] if verification is enabled and fails.
pub fn extract_kpis(
    solution: &Solution,
    instance: &Instance,
    config: &PlannerConfig,
) -> Result<KpiReport, InvariantViolation> {
    if config.verify_invariants {
        verify(solution, instance, config.tolerance)?;
    }

    let vehicles = solution
        .routes()
        .iter()
        .filter_map(|route| {
            let vehicle = instance.vehicle(route.vehicle().as_str())?;
            let cost = route.cost();
            Some(VehicleKpi {
                vehicle: route.vehicle().clone(),
                center: route.center().cloned(),
                clients_served: route.stops().len(),
                demand_served: route.demand(),
                total_distance: route.distance(),
                total_time: route.duration(),
                time_cost: cost.time,
                distance_cost: cost.distance,
                fuel_cost: cost.fuel,
                fixed_cost: cost.fixed,
                total_cost: cost.total(),
                fuel_volume: vehicle.fuel_volume(route.distance(), instance.economics()),
                utilization: route.demand() / vehicle.capacity,
                range_utilization: route.distance() / vehicle.range,
            })
        })
        .collect();

    let dispatched = solution.dispatched_by_center();
    let centers = instance
        .centers()
        .map(|center| {
            let demand = dispatched.get(&center.id).copied().unwrap_or(0.0);
            CenterKpi {
                center: center.id.clone(),
                demand_dispatched: demand,
                capacity: center.capacity,
                capacity_utilization: ratio(demand, center.capacity),
                vehicles_launched: solution
                    .active_routes()
                    .filter(|route| route.center() == Some(&center.id))
                    .count(),
            }
        })
        .collect();

    Ok(KpiReport {
        centers,
        vehicles,
        total_cost: solution.objective(),
    })
}

/// Render hours since midnight as `HH:MM`, wrapping past midnight.
///
/// # Examples
/// ```
/// assert_eq!(depotflow_core::clock_time(8.5), "08:30");
/// assert_eq!(depotflow_core::clock_time(25.25), "01:15");
/// ```
#[must_use]
pub fn clock_time(hours: f64) -> String {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clock times are small non-negative values"
    )]
    let minutes = (hours * 60.0).round().max(0.0) as u64;
    let (hh, mm) = (minutes.div_euclid(60).rem_euclid(24), minutes.rem_euclid(60));
    format!("{hh:02}:{mm:02}")
}

/// Verification rows for every dispatched vehicle.
///
/// Arrival times accumulate travel and service time from
/// [`PlannerConfig::start_hour`].
#[must_use]
pub fn route_summaries(
    solution: &Solution,
    instance: &Instance,
    config: &PlannerConfig,
) -> Vec<RouteSummary> {
    solution
        .active_routes()
        .filter_map(|route| {
            let center = route.center()?.clone();
            let mut clock = config.start_hour;
            let mut arrival_times = Vec::with_capacity(route.stops().len());
            let mut demands_satisfied = Vec::with_capacity(route.stops().len());
            for usage in route.arcs() {
                clock += usage.time;
                if let Some(client) = instance.client(usage.destination.as_str()) {
                    arrival_times.push(clock_time(clock));
                    demands_satisfied.push(client.demand);
                    clock += client.service_time;
                }
            }
            let route_sequence = route
                .sequence()
                .iter()
                .map(|node| node.as_str())
                .collect::<Vec<_>>()
                .join("-");
            Some(RouteSummary {
                vehicle: route.vehicle().clone(),
                center,
                initial_load: route.demand(),
                route_sequence,
                clients_served: route.stops().to_vec(),
                demands_satisfied,
                arrival_times,
                total_distance: route.distance(),
                total_time: route.duration(),
                total_cost: route.cost().total(),
            })
        })
        .collect()
}
