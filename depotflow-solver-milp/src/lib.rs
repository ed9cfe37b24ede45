//! MILP adapter for depotflow.
//!
//! [`MilpSolver`] implements the [`Solver`](depotflow_core::Solver) trait by
//! handing the arc-based [`Formulation`](depotflow_core::Formulation) to an
//! external mixed-integer engine through the narrow [`MilpBackend`] trait.
//! The crate ships [`CbcBackend`], which drives the COIN-OR `cbc` executable
//! through an LP file; other engines plug in by implementing the trait.
//!
//! Engine output is never trusted for costs: selected traversal variables
//! are decoded into routes and every derived quantity is recomputed from the
//! instance, so the result has the same shape and guarantees as any other
//! strategy.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod cbc;
pub mod lp_format;
mod solver;

pub use backend::{BackendError, BackendSolution, BackendStatus, Deadline, MilpBackend};
pub use cbc::{CbcBackend, parse_solution};
pub use solver::{MilpSolver, MilpSolverConfig};
