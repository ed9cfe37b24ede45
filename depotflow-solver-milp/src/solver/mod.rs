//! `MilpSolver`: the strategy that hands a formulation to a MILP backend.

use std::time::Duration;

use depotflow_core::{
    Error, Formulation, InfeasibilityReason, Instance, Solution, SolveError, Solver,
    VariableRole,
};

use crate::backend::{BackendError, BackendStatus, Deadline, MilpBackend};
use crate::cbc::CbcBackend;

/// Configuration for [`MilpSolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct MilpSolverConfig {
    /// Wall-clock budget for one solve.
    pub time_limit: Duration,
    /// Traversal variables above this value count as selected.
    pub integrality_threshold: f64,
    /// Relative gap tolerated between the backend's objective and the
    /// decoded routes' cost before a warning is logged.
    pub objective_tolerance: f64,
}

impl Default for MilpSolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
            integrality_threshold: 0.5,
            objective_tolerance: 1e-6,
        }
    }
}

/// Strategy delegating the formulation to the first available backend.
///
/// Backends are tried in the order given; the first whose
/// [`is_available`](MilpBackend::is_available) returns `true` is used. The
/// backend's traversal values are decoded into routes and re-costed from
/// the instance, so the returned objective always matches the routes.
pub struct MilpSolver {
    backends: Vec<Box<dyn MilpBackend>>,
    config: MilpSolverConfig,
}

impl Default for MilpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MilpSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(|backend| backend.name()).collect();
        f.debug_struct("MilpSolver")
            .field("backends", &names)
            .field("config", &self.config)
            .finish()
    }
}

impl MilpSolver {
    /// Construct a solver using CBC and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backends(
            vec![Box::new(CbcBackend::new())],
            MilpSolverConfig::default(),
        )
    }

    /// Construct a solver with explicit backends and configuration.
    #[must_use]
    pub const fn with_backends(backends: Vec<Box<dyn MilpBackend>>, config: MilpSolverConfig) -> Self {
        Self { backends, config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MilpSolverConfig {
        &self.config
    }

    fn backend(&self) -> Result<&dyn MilpBackend, SolveError> {
        for backend in &self.backends {
            if backend.is_available() {
                return Ok(backend.as_ref());
            }
            log::warn!("MILP backend {} is unavailable, trying the next one", backend.name());
        }
        let tried: Vec<&str> = self.backends.iter().map(|backend| backend.name()).collect();
        Err(SolveError::SolverUnavailable {
            reason: format!("no MILP backend available (tried: {})", tried.join(", ")),
        })
    }

    fn map_backend_error(&self, backend: &str, err: &BackendError) -> SolveError {
        match err {
            BackendError::DeadlineExceeded { .. } => SolveError::Timeout {
                limit: self.config.time_limit,
            },
            other => SolveError::Backend {
                backend: backend.to_owned(),
                message: other.to_string(),
            },
        }
    }
}

/// Clients that no traversal variable enters.
///
/// Their visit constraints have no terms, which no engine can satisfy.
fn unreachable_client(instance: &Instance, formulation: &Formulation) -> Option<SolveError> {
    instance
        .clients()
        .find(|client| {
            !formulation.variables().iter().any(|variable| {
                matches!(
                    &variable.role,
                    VariableRole::Traverse { destination, .. } if *destination == client.id
                )
            })
        })
        .map(|client| {
            SolveError::infeasible(InfeasibilityReason::ClientUnreachable {
                client: client.id.clone(),
            })
        })
}

impl Solver for MilpSolver {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn solve(&self, instance: &Instance, formulation: &Formulation) -> Result<Solution, Error> {
        if instance.client_count() == 0 {
            return Ok(Solution::new(instance, Vec::new(), self.name())?);
        }
        if let Some(err) = unreachable_client(instance, formulation) {
            return Err(err);
        }

        let backend = self.backend()?;
        let deadline = Deadline::start(self.config.time_limit);
        let outcome = backend
            .optimise(formulation, &deadline)
            .map_err(|err| self.map_backend_error(backend.name(), &err))?;
        log::debug!(
            "{} finished with {:?} in {:?}",
            backend.name(),
            outcome.status,
            deadline.elapsed()
        );

        match outcome.status {
            BackendStatus::Optimal => {
                if deadline.is_expired() {
                    log::warn!(
                        "{} proved optimality after the {:?} limit; keeping the result",
                        backend.name(),
                        self.config.time_limit
                    );
                }
            }
            BackendStatus::Infeasible => {
                return Err(SolveError::infeasible(
                    InfeasibilityReason::ReportedBySolver {
                        solver: backend.name().to_owned(),
                    },
                ));
            }
            BackendStatus::TimeLimit => {
                return Err(SolveError::Timeout {
                    limit: self.config.time_limit,
                });
            }
        }

        let arcs = formulation.selected_arcs(&outcome.values, self.config.integrality_threshold);
        let solution = Solution::from_arc_selection(instance, arcs, self.name())?;
        if let Some(reported) = outcome.objective {
            let scale = solution.objective().abs().max(1.0);
            if (reported - solution.objective()).abs() > self.config.objective_tolerance * scale {
                log::warn!(
                    "{} reported objective {reported} but decoded routes cost {}",
                    backend.name(),
                    solution.objective()
                );
            }
        }
        Ok(solution)
    }
}
