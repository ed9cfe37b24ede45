//! The solver strategy boundary and the `solve` entry point.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::{
    Formulation, Instance, InvariantViolation, NodeId, PlannerConfig, RouteError, Solution,
    verify,
};

/// Why an instance has no feasible plan.
#[derive(Debug, Clone, PartialEq)]
pub enum InfeasibilityReason {
    /// Total demand exceeds total vehicle capacity.
    FleetCapacity {
        /// Sum of client demand.
        demand: f64,
        /// Sum of vehicle capacity.
        capacity: f64,
    },
    /// Total demand exceeds total center capacity.
    CenterCapacity {
        /// Sum of client demand.
        demand: f64,
        /// Sum of center capacity.
        capacity: f64,
    },
    /// No vehicle can serve the client on its own round trip.
    ClientUnreachable {
        /// Client identifier.
        client: NodeId,
    },
    /// Every client is individually reachable but no complete plan fits.
    NoFeasibleAssignment,
    /// An external solver proved infeasibility.
    ReportedBySolver {
        /// Name of the reporting solver.
        solver: String,
    },
}

impl fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FleetCapacity { demand, capacity } => {
                write!(f, "demand {demand} exceeds fleet capacity {capacity}")
            }
            Self::CenterCapacity { demand, capacity } => {
                write!(f, "demand {demand} exceeds center capacity {capacity}")
            }
            Self::ClientUnreachable { client } => {
                write!(f, "no vehicle can reach client {client}")
            }
            Self::NoFeasibleAssignment => f.write_str("no assignment satisfies every constraint"),
            Self::ReportedBySolver { solver } => write!(f, "{solver} reported infeasibility"),
        }
    }
}

/// Errors returned by [`Solver::solve`] and [`solve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// No feasible solution exists.
    #[error("instance is infeasible: {reason}")]
    Infeasible {
        /// Diagnosed cause.
        reason: InfeasibilityReason,
    },
    /// No usable solver is configured or installed.
    #[error("solver unavailable: {reason}")]
    SolverUnavailable {
        /// What was missing.
        reason: String,
    },
    /// The solver exceeded the caller's time budget.
    #[error("solver exceeded its time limit of {limit:?}")]
    Timeout {
        /// The budget that was exceeded.
        limit: Duration,
    },
    /// The instance exceeds the exact solver's size ceiling.
    #[error(
        "instance too large: {clients} clients and {vehicles} vehicles \
         (limit {max_clients} and {max_vehicles})"
    )]
    InstanceTooLarge {
        /// Clients in the instance.
        clients: usize,
        /// Vehicles in the instance.
        vehicles: usize,
        /// Configured client ceiling.
        max_clients: usize,
        /// Configured vehicle ceiling.
        max_vehicles: usize,
    },
    /// The strategy produced routes that could not be assembled.
    #[error("solver returned malformed routes: {0}")]
    MalformedSolution(#[from] RouteError),
    /// The solution disagrees with the formulation.
    #[error("solution disagrees with the formulation: {reason}")]
    FormulationMismatch {
        /// Description of the disagreement.
        reason: String,
    },
    /// An external backend failed.
    #[error("backend {backend} failed: {message}")]
    Backend {
        /// Backend name.
        backend: String,
        /// Failure description.
        message: String,
    },
    /// The returned solution breaks an invariant.
    #[error("solution violates an invariant: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

impl SolveError {
    /// Shorthand for [`SolveError::Infeasible`].
    #[must_use]
    pub const fn infeasible(reason: InfeasibilityReason) -> Self {
        Self::Infeasible { reason }
    }
}

/// Alias for the solver error type.
pub type Error = SolveError;

/// A strategy that turns a formulation into a [`Solution`].
///
/// Strategies are interchangeable: each returns the same solution shape and
/// must satisfy every invariant checked by [`verify`]. Solvers must be
/// `Send + Sync` so independent instances can be solved in parallel.
pub trait Solver: Send + Sync {
    /// Short name recorded on produced solutions.
    fn name(&self) -> &str;

    /// Solve `instance`, whose model is `formulation`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when no solution can be produced.
    fn solve(&self, instance: &Instance, formulation: &Formulation) -> Result<Solution, Error>;
}

/// Build the formulation, run `strategy` and verify its output.
///
/// # Errors
///
/// Propagates the strategy's [`SolveError`] and reports
/// [`SolveError::InvariantViolation`] when the returned solution is not
/// valid for `instance`.
pub fn solve(
    instance: &Instance,
    strategy: &dyn Solver,
    config: &PlannerConfig,
) -> Result<Solution, Error> {
    let formulation = Formulation::build(instance);
    let solution = strategy.solve(instance, &formulation)?;
    verify(&solution, instance, config.tolerance)?;
    log::info!(
        "{} solved {} clients with {} active vehicles, objective {:.4}",
        strategy.name(),
        instance.client_count(),
        solution.active_routes().count(),
        solution.objective()
    );
    Ok(solution)
}
