//! Per-node, per-vehicle access restrictions.
//!
//! A missing rule means the vehicle is allowed at the node.

use std::collections::HashMap;

use crate::{NodeId, VehicleId};

/// A single access rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Node the rule applies to.
    pub node: NodeId,
    /// Vehicle the rule applies to.
    pub vehicle: VehicleId,
    /// Whether the vehicle may visit the node.
    pub allowed: bool,
}

/// Lookup table of access rules.
///
/// # Examples
/// ```
/// use depotflow_core::{AccessRule, AccessRules, NodeId, VehicleId};
///
/// let mut rules = AccessRules::default();
/// rules.insert(AccessRule {
///     node: NodeId::from("CL1"),
///     vehicle: VehicleId::from("TRUCK"),
///     allowed: false,
/// });
/// assert!(!rules.is_allowed("CL1", "TRUCK"));
/// assert!(rules.is_allowed("CL2", "TRUCK"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRules {
    rules: HashMap<NodeId, HashMap<VehicleId, bool>>,
}

impl AccessRules {
    /// Record a rule, returning the previous value for the same pair.
    pub fn insert(&mut self, rule: AccessRule) -> Option<bool> {
        self.rules
            .entry(rule.node)
            .or_default()
            .insert(rule.vehicle, rule.allowed)
    }

    /// Whether `vehicle` may visit `node`. Defaults to `true`.
    #[must_use]
    pub fn is_allowed(&self, node: &str, vehicle: &str) -> bool {
        self.rules
            .get(node)
            .and_then(|per_vehicle| per_vehicle.get(vehicle))
            .copied()
            .unwrap_or(true)
    }

    /// Number of explicit `(node, vehicle)` pairs that deny access.
    #[must_use]
    pub fn denied_count(&self) -> usize {
        self.rules
            .values()
            .flat_map(HashMap::values)
            .filter(|allowed| !**allowed)
            .count()
    }
}
