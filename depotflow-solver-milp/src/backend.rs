//! The boundary between [`MilpSolver`](crate::MilpSolver) and concrete MILP
//! engines.

use std::io;
use std::time::{Duration, Instant};

use depotflow_core::{Assignment, Formulation};
use thiserror::Error;

/// Wall-clock budget shared by the solver and its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start a budget of `limit` from now.
    #[must_use]
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// The full budget.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    /// Time spent since the budget started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// Whether the budget is spent.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.limit
    }
}

/// Termination status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    /// Proven optimal.
    Optimal,
    /// Proven infeasible.
    Infeasible,
    /// Stopped by the time limit before proving optimality.
    TimeLimit,
}

/// Values returned by a backend run.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSolution {
    /// How the run ended.
    pub status: BackendStatus,
    /// Objective value reported by the engine, if any.
    pub objective: Option<f64>,
    /// Value of every formulation variable, indexed by [`VarId`](depotflow_core::VarId).
    pub values: Assignment,
}

/// Failures while driving a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing model files, or launching the engine, failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The engine exited unsuccessfully.
    #[error("engine exited with {status}: {detail}")]
    Exited {
        /// Exit status description.
        status: String,
        /// Last lines of the engine log.
        detail: String,
    },
    /// The engine was stopped after the deadline passed.
    #[error("engine killed after {elapsed:?}")]
    DeadlineExceeded {
        /// Time spent before the engine was stopped.
        elapsed: Duration,
    },
    /// The engine's output could not be understood.
    #[error("malformed engine output: {line}")]
    MalformedOutput {
        /// Offending line.
        line: String,
    },
    /// The output names a variable the model does not have.
    #[error("engine reported unknown variable {name}")]
    UnknownVariable {
        /// Name as reported.
        name: String,
    },
    /// The formulation cannot be expressed for this engine.
    #[error("formulation cannot be exported: {reason}")]
    Unsupported {
        /// Why the export failed.
        reason: String,
    },
}

impl BackendError {
    /// Wrap an [`io::Error`] with a short description of the failed step.
    #[must_use]
    pub const fn io(context: &'static str, source: io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// A MILP engine able to optimise a [`Formulation`].
///
/// Backends must be `Send + Sync` so a [`MilpSolver`](crate::MilpSolver) can
/// be shared across threads.
pub trait MilpBackend: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Whether the engine can be used in this environment.
    fn is_available(&self) -> bool;

    /// Minimise the formulation's objective within `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the engine cannot be run or its output
    /// cannot be read.
    fn optimise(
        &self,
        formulation: &Formulation,
        deadline: &Deadline,
    ) -> Result<BackendSolution, BackendError>;
}
