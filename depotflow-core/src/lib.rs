//! Core model of the depotflow fleet routing planner.
//!
//! The crate holds the validated [`Instance`], the arc-based
//! [`Formulation`] handed to solver strategies, the [`Solution`] shape every
//! strategy returns, the invariant checker and the KPI extractor.
//!
//! The two entry points are [`solve`] and [`extract_kpis`]. Both take an
//! explicit [`PlannerConfig`]; the crate keeps no global state.

#![forbid(unsafe_code)]

mod access;
mod arc;
mod config;
mod cost;
mod formulation;
mod ids;
mod instance;
mod invariant;
mod kpi;
mod node;
mod solution;
mod solver;
mod vehicle;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use access::{AccessRule, AccessRules};
pub use arc::{Arc, ArcCatalog};
pub use config::PlannerConfig;
pub use cost::{CostBreakdown, arc_cost};
pub use formulation::{
    ArcKey, Assignment, Audit, Constraint, ConstraintFamily, Formulation, FormulationError,
    LinearTerm, Sense, VarId, Variable, VariableKind, VariableRole, Violation,
};
pub use ids::{NodeId, VehicleId};
pub use instance::{
    AccessRecord, ArcRecord, CenterRecord, ClientRecord, DataIntegrityError, EconomicsRecord,
    Instance, InstanceRecords, VehicleRecord,
};
pub use invariant::{InvariantViolation, verify};
pub use kpi::{
    CenterKpi, KpiReport, RouteSummary, VehicleKpi, clock_time, extract_kpis, route_summaries,
};
pub use node::{Center, Client, Node, NodeKind};
pub use solution::{
    ArcUsage, FLOW_EPSILON, FlowRecord, RouteError, SelectedArcRecord, Solution, VehicleRoute,
};
pub use solver::{Error, InfeasibilityReason, SolveError, Solver, solve};
pub use vehicle::{Economics, Vehicle};
