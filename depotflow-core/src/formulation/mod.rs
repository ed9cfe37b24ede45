//! The arc-based mixed-integer routing model.
//!
//! [`Formulation::build`] turns an [`Instance`] into an explicit linear
//! model: binary traversal variables `x[k,i,j]`, continuous load variables
//! `y[k,i,j]`, center choice `z[c,k]`, activation `u[k]` and center supply
//! `s[c]`, together with the constraint families listed in
//! [`ConstraintFamily`]. Arcs touching a node a vehicle may not access are
//! never modelled, nor are center-to-center arcs.
//!
//! The formulation performs no solving. It is handed to a solver strategy
//! as-is and can score any [`Solution`] against its own constraints through
//! [`Formulation::audit`].

mod builder;
mod model;

use std::collections::BTreeMap;

use thiserror::Error;

pub use model::{
    Assignment, Constraint, ConstraintFamily, LinearTerm, Sense, VarId, Variable, VariableKind,
    VariableRole, Violation,
};

use crate::{Instance, NodeId, Solution, VehicleId};

/// `(vehicle, origin, destination)` key of per-vehicle arc variables.
pub type ArcKey = (VehicleId, NodeId, NodeId);

/// Errors raised while mapping a [`Solution`] onto a [`Formulation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulationError {
    /// The solution uses an arc the formulation has no variable for.
    #[error("vehicle {vehicle} uses unmodelled arc {origin}->{destination}")]
    UnmodelledArc {
        /// Vehicle using the arc.
        vehicle: VehicleId,
        /// Arc origin.
        origin: NodeId,
        /// Arc destination.
        destination: NodeId,
    },
    /// The solution launches a vehicle from a center it may not use.
    #[error("vehicle {vehicle} cannot launch from center {center}")]
    UnmodelledLaunch {
        /// Vehicle launched.
        vehicle: VehicleId,
        /// Center used.
        center: NodeId,
    },
    /// The solution names a vehicle the formulation does not know.
    #[error("unknown vehicle {vehicle}")]
    UnknownVehicle {
        /// Vehicle named by the solution.
        vehicle: VehicleId,
    },
}

/// Objective value and violated constraints of a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Audit {
    /// Objective value of the mapped assignment.
    pub objective: f64,
    /// Constraints the assignment violates.
    pub violations: Vec<Violation>,
}

impl Audit {
    /// Whether every constraint holds.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Variables, objective and constraints of one routing problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formulation {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    traverse: BTreeMap<ArcKey, VarId>,
    load: BTreeMap<ArcKey, VarId>,
    launch: BTreeMap<(NodeId, VehicleId), VarId>,
    active: BTreeMap<VehicleId, VarId>,
    supply: BTreeMap<NodeId, VarId>,
}

fn arc_key(vehicle: &str, origin: &str, destination: &str) -> ArcKey {
    (
        VehicleId::from(vehicle),
        NodeId::from(origin),
        NodeId::from(destination),
    )
}

impl Formulation {
    /// Build the model for `instance`.
    ///
    /// # Examples
    /// ```
    /// use depotflow_core::{
    ///     ArcRecord, CenterRecord, ClientRecord, ConstraintFamily, EconomicsRecord, Formulation,
    ///     Instance, InstanceRecords, VehicleRecord,
    /// };
    ///
    /// # fn main() -> Result<(), depotflow_core::DataIntegrityError> {
    /// let arc = |origin: &str, destination: &str| ArcRecord {
    ///     origin: origin.into(), destination: destination.into(), distance: 5.0, time: 0.1,
    /// };
    /// let instance = Instance::from_records(InstanceRecords {
    ///     centers: vec![CenterRecord { id: "CD1".into(), capacity: 50.0, latitude: 0.0, longitude: 0.0 }],
    ///     clients: vec![ClientRecord {
    ///         id: "CL1".into(), demand: 5.0, latitude: 0.0, longitude: 0.1, service_time: None,
    ///     }],
    ///     vehicles: vec![VehicleRecord {
    ///         id: "V1".into(), capacity: 10.0, range: 100.0, eff: 8.0, w_time: 10.0,
    ///         c_km: 0.5, f_fixed: 20.0, t_max: 8.0, home_center: None,
    ///     }],
    ///     economics: EconomicsRecord { fuel_price: 1.0, alpha: 1.0 },
    ///     access: Vec::new(),
    ///     arcs: vec![arc("CD1", "CL1"), arc("CL1", "CD1")],
    /// })?;
    /// let formulation = Formulation::build(&instance);
    /// assert!(formulation.traverse_var("V1", "CD1", "CL1").is_some());
    /// assert_eq!(formulation.constraints_in(ConstraintFamily::VisitIn).count(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn build(instance: &Instance) -> Self {
        builder::build(instance)
    }

    /// All variables in id order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Look up a variable.
    #[must_use]
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// All constraints.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints of one family.
    pub fn constraints_in(&self, family: ConstraintFamily) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(move |constraint| constraint.family == family)
    }

    /// `x[vehicle,origin,destination]`, if modelled.
    #[must_use]
    pub fn traverse_var(&self, vehicle: &str, origin: &str, destination: &str) -> Option<VarId> {
        self.traverse
            .get(&arc_key(vehicle, origin, destination))
            .copied()
    }

    /// `y[vehicle,origin,destination]`, if modelled.
    #[must_use]
    pub fn load_var(&self, vehicle: &str, origin: &str, destination: &str) -> Option<VarId> {
        self.load.get(&arc_key(vehicle, origin, destination)).copied()
    }

    /// `z[center,vehicle]`, if the vehicle may launch from the center.
    #[must_use]
    pub fn launch_var(&self, center: &str, vehicle: &str) -> Option<VarId> {
        self.launch
            .get(&(NodeId::from(center), VehicleId::from(vehicle)))
            .copied()
    }

    /// `u[vehicle]`.
    #[must_use]
    pub fn active_var(&self, vehicle: &str) -> Option<VarId> {
        self.active.get(vehicle).copied()
    }

    /// `s[center]`.
    #[must_use]
    pub fn supply_var(&self, center: &str) -> Option<VarId> {
        self.supply.get(center).copied()
    }

    /// Objective value of `assignment`.
    #[must_use]
    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        self.variables
            .iter()
            .map(|variable| variable.objective * assignment.value(variable.id))
            .sum()
    }

    /// Constraints and variable bounds violated by `assignment`.
    ///
    /// Bound violations are reported under the variable's name. Load and
    /// supply bounds carry the capacity family they stand in for; binaries
    /// are reported as [`ConstraintFamily::Bounds`].
    #[must_use]
    pub fn violations(&self, assignment: &Assignment, tolerance: f64) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfied(assignment, tolerance))
            .map(|constraint| Violation {
                constraint: constraint.name.clone(),
                family: constraint.family,
                activity: constraint.activity(assignment),
                sense: constraint.sense,
                rhs: constraint.rhs,
            })
            .collect();
        for variable in &self.variables {
            let value = assignment.value(variable.id);
            let family = match variable.role {
                VariableRole::Load { .. } => ConstraintFamily::ArcCapacity,
                VariableRole::Supply { .. } => ConstraintFamily::CenterCapacity,
                VariableRole::Traverse { .. }
                | VariableRole::Launch { .. }
                | VariableRole::Active { .. } => ConstraintFamily::Bounds,
            };
            if value > variable.upper + tolerance {
                violations.push(Violation {
                    constraint: variable.name.clone(),
                    family,
                    activity: value,
                    sense: Sense::LessEqual,
                    rhs: variable.upper,
                });
            } else if value < variable.lower - tolerance {
                violations.push(Violation {
                    constraint: variable.name.clone(),
                    family,
                    activity: value,
                    sense: Sense::GreaterEqual,
                    rhs: variable.lower,
                });
            }
        }
        violations
    }

    /// Map a solution onto the formulation's variables.
    ///
    /// # Errors
    ///
    /// Returns [`FormulationError`] if the solution uses an arc, center or
    /// vehicle the formulation does not model.
    pub fn assignment_for(&self, solution: &Solution) -> Result<Assignment, FormulationError> {
        let mut assignment = Assignment::zeros(self.variables.len());
        for route in solution.routes() {
            let vehicle = route.vehicle();
            let Some(center) = route.center() else {
                continue;
            };
            let active = self
                .active_var(vehicle.as_str())
                .ok_or_else(|| FormulationError::UnknownVehicle {
                    vehicle: vehicle.clone(),
                })?;
            assignment.set(active, 1.0);
            let launch = self
                .launch_var(center.as_str(), vehicle.as_str())
                .ok_or_else(|| FormulationError::UnmodelledLaunch {
                    vehicle: vehicle.clone(),
                    center: center.clone(),
                })?;
            assignment.set(launch, 1.0);

            for usage in route.arcs() {
                let key = (
                    vehicle.clone(),
                    usage.origin.clone(),
                    usage.destination.clone(),
                );
                let (Some(&traverse), Some(&load)) = (self.traverse.get(&key), self.load.get(&key))
                else {
                    return Err(FormulationError::UnmodelledArc {
                        vehicle: key.0,
                        origin: key.1,
                        destination: key.2,
                    });
                };
                assignment.set(traverse, 1.0);
                assignment.set(load, usage.load);
            }
            if let Some(supply) = self.supply_var(center.as_str()) {
                assignment.add(supply, route.demand());
            }
        }
        Ok(assignment)
    }

    /// Score `solution` against the model.
    ///
    /// # Errors
    ///
    /// Propagates [`FormulationError`] from [`Formulation::assignment_for`].
    pub fn audit(&self, solution: &Solution, tolerance: f64) -> Result<Audit, FormulationError> {
        let assignment = self.assignment_for(solution)?;
        Ok(Audit {
            objective: self.objective_value(&assignment),
            violations: self.violations(&assignment, tolerance),
        })
    }

    /// Arcs whose traversal variable exceeds `threshold`, in key order.
    #[must_use]
    pub fn selected_arcs(&self, assignment: &Assignment, threshold: f64) -> Vec<ArcKey> {
        self.traverse
            .iter()
            .filter(|(_, var)| assignment.value(**var) > threshold)
            .map(|(key, _)| key.clone())
            .collect()
    }
}
