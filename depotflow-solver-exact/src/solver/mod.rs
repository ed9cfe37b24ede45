//! `ExactSolver` implementation backed by exhaustive enumeration.

use depotflow_core::{
    Error, Formulation, InfeasibilityReason, Instance, NodeId, Solution, SolveError, Solver,
    VehicleRoute,
};

use crate::search::{FEASIBILITY_SLACK, Plan, Search, VehicleChoice};

/// Hard ceiling on clients: client sets are tracked as `u32` bit masks and
/// enumeration beyond this is impractical.
pub const CLIENT_CEILING: usize = 16;

/// Relative tolerance used when comparing the solution with its audit.
const AUDIT_TOLERANCE: f64 = 1e-6;

/// Configuration for [`ExactSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExactSolverConfig {
    /// Largest client count accepted. Values above [`CLIENT_CEILING`] are
    /// clamped to it.
    pub max_clients: usize,
    /// Largest vehicle count accepted.
    pub max_vehicles: usize,
    /// Relative gap under which two plan costs count as tied.
    pub tie_epsilon: f64,
    /// Evaluate the chosen plan against the formulation before returning it.
    pub audit_formulation: bool,
}

impl Default for ExactSolverConfig {
    fn default() -> Self {
        Self {
            max_clients: 8,
            max_vehicles: 4,
            tie_epsilon: 1e-9,
            audit_formulation: true,
        }
    }
}

/// Reference solver that enumerates every plan of a small instance.
///
/// Every assignment of clients to vehicles is tried, each dispatched
/// vehicle gets its cheapest visiting order for every usable center, and
/// centers are then chosen jointly under their capacities. Among plans
/// whose cost ties within `tie_epsilon`, the one whose per-vehicle choices
/// sort first wins, so repeated runs return identical solutions.
#[derive(Debug, Clone, Default)]
pub struct ExactSolver {
    config: ExactSolverConfig,
}

impl ExactSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExactSolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: ExactSolverConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExactSolverConfig {
        &self.config
    }

    fn check_size(&self, instance: &Instance) -> Result<(), SolveError> {
        let max_clients = self.config.max_clients.min(CLIENT_CEILING);
        let (clients, vehicles) = (instance.client_count(), instance.vehicle_count());
        if clients > max_clients || vehicles > self.config.max_vehicles {
            return Err(SolveError::InstanceTooLarge {
                clients,
                vehicles,
                max_clients,
                max_vehicles: self.config.max_vehicles,
            });
        }
        Ok(())
    }

    fn audit(&self, formulation: &Formulation, solution: &Solution) -> Result<(), SolveError> {
        if !self.config.audit_formulation {
            return Ok(());
        }
        let audit = formulation
            .audit(solution, AUDIT_TOLERANCE)
            .map_err(|err| SolveError::FormulationMismatch {
                reason: err.to_string(),
            })?;
        if let Some(violation) = audit.violations.first() {
            return Err(SolveError::FormulationMismatch {
                reason: format!(
                    "{} of {} constraints violated, first {violation}",
                    audit.violations.len(),
                    formulation.constraints().len()
                ),
            });
        }
        let scale = solution.objective().abs().max(1.0);
        if (audit.objective - solution.objective()).abs() > AUDIT_TOLERANCE * scale {
            return Err(SolveError::FormulationMismatch {
                reason: format!(
                    "formulation objective {} differs from route cost {}",
                    audit.objective,
                    solution.objective()
                ),
            });
        }
        Ok(())
    }
}

/// Cheap necessary conditions checked before enumeration.
fn diagnose(instance: &Instance, search: &mut Search<'_>) -> Result<(), SolveError> {
    let demand = instance.total_demand();
    let fleet = instance.fleet_capacity();
    if demand > fleet + FEASIBILITY_SLACK {
        return Err(SolveError::infeasible(InfeasibilityReason::FleetCapacity {
            demand,
            capacity: fleet,
        }));
    }
    let centers = instance.center_capacity();
    if demand > centers + FEASIBILITY_SLACK {
        return Err(SolveError::infeasible(
            InfeasibilityReason::CenterCapacity {
                demand,
                capacity: centers,
            },
        ));
    }
    let ids: Vec<NodeId> = search.clients().iter().map(|c| c.id.clone()).collect();
    for (index, client) in ids.into_iter().enumerate() {
        if !search.can_serve_alone(index) {
            return Err(SolveError::infeasible(
                InfeasibilityReason::ClientUnreachable { client },
            ));
        }
    }
    Ok(())
}

/// Turn the winning plan into routes.
fn routes_for(search: &Search<'_>, plan: &Plan) -> Result<Vec<VehicleRoute>, SolveError> {
    let mut routes = Vec::with_capacity(plan.choices.len());
    for (vehicle, choice) in search.vehicles().iter().zip(&plan.choices) {
        let VehicleChoice::Route { center, order } = choice else {
            continue;
        };
        let Some(depot) = search.centers().get(*center) else {
            continue;
        };
        let stops: Vec<NodeId> = order
            .iter()
            .filter_map(|&client| search.clients().get(client))
            .map(|client| client.id.clone())
            .collect();
        routes.push(VehicleRoute::build(
            search.instance(),
            &vehicle.id,
            &depot.id,
            stops,
        )?);
    }
    Ok(routes)
}

impl Solver for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, instance: &Instance, formulation: &Formulation) -> Result<Solution, Error> {
        self.check_size(instance)?;
        let mut search = Search::new(instance, self.config.tie_epsilon);
        diagnose(instance, &mut search)?;

        let plan = search
            .run()
            .ok_or_else(|| SolveError::infeasible(InfeasibilityReason::NoFeasibleAssignment))?;
        let stats = search.stats();
        log::debug!(
            "exact search: {} assignments, {} routes evaluated, {} plans compared, cost {:.4}",
            stats.assignments,
            stats.routes_evaluated,
            stats.plans_compared,
            plan.cost
        );

        let routes = routes_for(&search, &plan)?;
        let solution = Solution::new(instance, routes, self.name())?;
        self.audit(formulation, &solution)?;
        Ok(solution)
    }
}

#[cfg(test)]
mod tests;
