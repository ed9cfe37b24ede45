//! Exact reference solver for depotflow.
//!
//! This crate provides [`ExactSolver`], an implementation of the
//! [`Solver`](depotflow_core::Solver) trait that enumerates every plan of a
//! small instance and returns a provably optimal one. It is the ground-truth
//! oracle other strategies are validated against, so it refuses instances
//! above its configured size with
//! [`SolveError::InstanceTooLarge`](depotflow_core::SolveError::InstanceTooLarge)
//! rather than running for an unbounded time.
//!
//! Before enumerating, the solver checks cheap necessary conditions (fleet
//! capacity, center capacity and whether each client can be served on its
//! own) so infeasible instances come back with a specific
//! [`InfeasibilityReason`](depotflow_core::InfeasibilityReason).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod search;
mod solver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use solver::{CLIENT_CEILING, ExactSolver, ExactSolverConfig};
