//! Fleet vehicles and the fuel economics shared by the whole fleet.

use crate::{NodeId, VehicleId};

/// Global fuel economics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Economics {
    /// Price per unit of fuel volume.
    pub fuel_price: f64,
    /// Scaling factor applied to the fuel consumption model.
    pub alpha: f64,
}

/// A vehicle with its capacity, range and cost parameters.
///
/// Range and fuel cost are both derived from `fuel_efficiency`; see
/// [`Vehicle::fuel_volume`] and [`Vehicle::fuel_cost_per_km`].
///
/// # Examples
/// ```
/// use depotflow_core::{Economics, Vehicle, VehicleId};
///
/// let vehicle = Vehicle {
///     id: VehicleId::from("V1"),
///     capacity: 100.0,
///     range: 500.0,
///     fuel_efficiency: 10.0,
///     time_cost: 10.0,
///     distance_cost: 1.0,
///     fixed_cost: 50.0,
///     max_duration: 8.0,
///     home_center: None,
/// };
/// let economics = Economics { fuel_price: 1.5, alpha: 1.0 };
/// assert!((vehicle.fuel_cost_per_km(&economics) - 0.15).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: VehicleId,
    /// Load capacity `Q`.
    pub capacity: f64,
    /// Maximum route distance `R`; not replenished mid-route.
    pub range: f64,
    /// Distance travelled per unit of fuel volume.
    pub fuel_efficiency: f64,
    /// Cost per hour of travel (`w_time`).
    pub time_cost: f64,
    /// Cost per distance unit (`c_km`).
    pub distance_cost: f64,
    /// Cost charged once when the vehicle is dispatched.
    pub fixed_cost: f64,
    /// Maximum route duration `Tmax` in hours.
    pub max_duration: f64,
    /// Center the vehicle must operate from. `None` lets the solve choose.
    pub home_center: Option<NodeId>,
}

impl Vehicle {
    /// Fuel volume consumed over `distance`.
    #[must_use]
    pub fn fuel_volume(&self, distance: f64, economics: &Economics) -> f64 {
        economics.alpha * distance / self.fuel_efficiency
    }

    /// Fuel cost per distance unit travelled.
    #[must_use]
    pub fn fuel_cost_per_km(&self, economics: &Economics) -> f64 {
        economics.fuel_price * self.fuel_volume(1.0, economics)
    }
}
