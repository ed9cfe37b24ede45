//! Facade crate for the depotflow fleet routing planner.
//!
//! This crate re-exports the core model and exposes the solver strategies
//! behind feature flags: `solver-exact` (on by default) for the exhaustive
//! reference solver and `solver-milp` for the external MILP adapter.
//!
//! ```rust
//! # #[cfg(feature = "solver-exact")]
//! # {
//! use depotflow::{ExactSolver, Instance, PlannerConfig, extract_kpis, solve};
//! # use depotflow::{
//! #     ArcRecord, CenterRecord, ClientRecord, EconomicsRecord, InstanceRecords, VehicleRecord,
//! # };
//! # let arc = |origin: &str, destination: &str| ArcRecord {
//! #     origin: origin.into(),
//! #     destination: destination.into(),
//! #     distance: 5.0,
//! #     time: 0.1,
//! # };
//! # let records = InstanceRecords {
//! #     centers: vec![CenterRecord { id: "CD1".into(), capacity: 100.0, latitude: 0.0, longitude: 0.0 }],
//! #     clients: vec![ClientRecord {
//! #         id: "CL1".into(), demand: 30.0, latitude: 0.0, longitude: 0.05, service_time: None,
//! #     }],
//! #     vehicles: vec![VehicleRecord {
//! #         id: "V1".into(), capacity: 50.0, range: 100.0, eff: 10.0, w_time: 10.0,
//! #         c_km: 1.0, f_fixed: 20.0, t_max: 8.0, home_center: None,
//! #     }],
//! #     economics: EconomicsRecord { fuel_price: 1.5, alpha: 1.0 },
//! #     access: Vec::new(),
//! #     arcs: vec![arc("CD1", "CL1"), arc("CL1", "CD1")],
//! # };
//! let instance = Instance::from_records(records).expect("valid instance");
//! let config = PlannerConfig::default();
//! let solution = solve(&instance, &ExactSolver::new(), &config).expect("feasible plan");
//! let report = extract_kpis(&solution, &instance, &config).expect("valid plan");
//! assert_eq!(report.vehicle("V1").map(|kpi| kpi.clients_served), Some(1));
//! # }
//! ```

#![forbid(unsafe_code)]

pub use depotflow_core::{
    ArcRecord, CenterKpi, CenterRecord, ClientRecord, DataIntegrityError, EconomicsRecord,
    Formulation, InfeasibilityReason, Instance, InstanceRecords, InvariantViolation, KpiReport,
    PlannerConfig, RouteSummary, Solution, SolveError, Solver, VehicleKpi, VehicleRecord,
    VehicleRoute, extract_kpis, route_summaries, solve, verify,
};

#[cfg(feature = "solver-exact")]
pub use depotflow_solver_exact::{ExactSolver, ExactSolverConfig};

#[cfg(feature = "solver-milp")]
pub use depotflow_solver_milp::{CbcBackend, MilpBackend, MilpSolver, MilpSolverConfig};
