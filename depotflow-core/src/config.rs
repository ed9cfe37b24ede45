//! Explicit planner configuration passed to [`solve`](crate::solve) and
//! [`extract_kpis`](crate::extract_kpis).

/// Settings shared by every solve and KPI extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Absolute slack used when checking solution invariants.
    pub tolerance: f64,
    /// Re-check invariants during KPI extraction.
    pub verify_invariants: bool,
    /// Clock hour at which routes depart, used for arrival times.
    pub start_hour: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            verify_invariants: cfg!(debug_assertions),
            start_hour: 8.0,
        }
    }
}
