//! Arc and route cost model.
//!
//! Every cost in the planner goes through [`CostBreakdown::for_arc`]: the
//! formulation's objective coefficients, the reference solver's route costs
//! and the KPI breakdown. The fuel term reads the same efficiency as the
//! range model through [`Vehicle::fuel_cost_per_km`].

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::{Arc, Economics, Vehicle};

/// Cost split into its time, distance, fuel and fixed components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// `w_time · travel time`.
    pub time: f64,
    /// `c_km · distance`.
    pub distance: f64,
    /// `fuel_price · alpha · distance / eff`.
    pub fuel: f64,
    /// Dispatch cost of the vehicle.
    pub fixed: f64,
}

impl CostBreakdown {
    /// All components zero.
    pub const ZERO: Self = Self {
        time: 0.0,
        distance: 0.0,
        fuel: 0.0,
        fixed: 0.0,
    };

    /// Variable cost of `vehicle` traversing `arc`.
    ///
    /// # Examples
    /// ```
    /// use depotflow_core::{Arc, CostBreakdown, Economics, NodeId, Vehicle, VehicleId};
    ///
    /// let vehicle = Vehicle {
    ///     id: VehicleId::from("V1"),
    ///     capacity: 100.0,
    ///     range: 500.0,
    ///     fuel_efficiency: 10.0,
    ///     time_cost: 20.0,
    ///     distance_cost: 1.0,
    ///     fixed_cost: 50.0,
    ///     max_duration: 8.0,
    ///     home_center: None,
    /// };
    /// let arc = Arc {
    ///     origin: NodeId::from("CD1"),
    ///     destination: NodeId::from("CL1"),
    ///     distance: 10.0,
    ///     time: 0.5,
    /// };
    /// let economics = Economics { fuel_price: 2.0, alpha: 1.0 };
    /// let cost = CostBreakdown::for_arc(&vehicle, &arc, &economics);
    /// assert_eq!(cost.time, 10.0);
    /// assert_eq!(cost.distance, 10.0);
    /// assert_eq!(cost.fuel, 2.0);
    /// assert_eq!(cost.fixed, 0.0);
    /// ```
    #[must_use]
    pub fn for_arc(vehicle: &Vehicle, arc: &Arc, economics: &Economics) -> Self {
        Self {
            time: vehicle.time_cost * arc.time,
            distance: vehicle.distance_cost * arc.distance,
            fuel: vehicle.fuel_cost_per_km(economics) * arc.distance,
            fixed: 0.0,
        }
    }

    /// Dispatch cost only.
    #[must_use]
    pub const fn fixed(amount: f64) -> Self {
        Self {
            fixed: amount,
            ..Self::ZERO
        }
    }

    /// Sum of the variable components.
    #[must_use]
    pub fn variable(&self) -> f64 {
        self.time + self.distance + self.fuel
    }

    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.variable() + self.fixed
    }
}

/// Total cost of `vehicle` traversing `arc`.
#[must_use]
pub fn arc_cost(vehicle: &Vehicle, arc: &Arc, economics: &Economics) -> f64 {
    CostBreakdown::for_arc(vehicle, arc, economics).total()
}

impl Add for CostBreakdown {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            time: self.time + rhs.time,
            distance: self.distance + rhs.distance,
            fuel: self.fuel + rhs.fuel,
            fixed: self.fixed + rhs.fixed,
        }
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for CostBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
