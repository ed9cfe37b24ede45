//! Directed travel arcs and the read-only catalog holding them.
//!
//! The catalog is produced by an external preprocessing step (geometry,
//! detour factors, speeds). The planner only reads it.

use std::collections::BTreeMap;

use crate::NodeId;

/// A directed arc between two distinct nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Node the arc leaves.
    pub origin: NodeId,
    /// Node the arc enters.
    pub destination: NodeId,
    /// Travel distance.
    pub distance: f64,
    /// Travel time in hours.
    pub time: f64,
}

/// Directed arcs keyed by `(origin, destination)`.
///
/// Iteration visits arcs ordered by origin, then destination.
///
/// # Examples
/// ```
/// use depotflow_core::{Arc, ArcCatalog, NodeId};
///
/// let mut catalog = ArcCatalog::default();
/// catalog.insert(Arc {
///     origin: NodeId::from("CD1"),
///     destination: NodeId::from("CL1"),
///     distance: 3.0,
///     time: 0.1,
/// });
/// assert!(catalog.get("CD1", "CL1").is_some());
/// assert!(catalog.get("CL1", "CD1").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcCatalog {
    arcs: BTreeMap<NodeId, BTreeMap<NodeId, Arc>>,
    len: usize,
}

impl ArcCatalog {
    /// Insert an arc, returning the arc it replaced, if any.
    pub fn insert(&mut self, arc: Arc) -> Option<Arc> {
        let previous = self
            .arcs
            .entry(arc.origin.clone())
            .or_default()
            .insert(arc.destination.clone(), arc);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Look up the arc from `origin` to `destination`.
    #[must_use]
    pub fn get(&self, origin: &str, destination: &str) -> Option<&Arc> {
        self.arcs.get(origin)?.get(destination)
    }

    /// Arcs leaving `origin`, ordered by destination.
    pub fn outgoing(&self, origin: &str) -> impl Iterator<Item = &Arc> {
        self.arcs.get(origin).into_iter().flat_map(BTreeMap::values)
    }

    /// All arcs in `(origin, destination)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.values().flat_map(BTreeMap::values)
    }

    /// Number of arcs in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the catalog holds no arcs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn arc(origin: &str, destination: &str, distance: f64) -> Arc {
        Arc {
            origin: NodeId::from(origin),
            destination: NodeId::from(destination),
            distance,
            time: distance / 50.0,
        }
    }

    #[rstest]
    fn replacing_an_arc_keeps_the_count() {
        let mut catalog = ArcCatalog::default();
        assert!(catalog.insert(arc("A", "B", 1.0)).is_none());
        let replaced = catalog.insert(arc("A", "B", 2.0));
        assert_eq!(replaced.map(|previous| previous.distance), Some(1.0));
        assert_eq!(catalog.len(), 1);
    }

    #[rstest]
    fn iteration_is_ordered() {
        let mut catalog = ArcCatalog::default();
        catalog.insert(arc("B", "A", 1.0));
        catalog.insert(arc("A", "C", 1.0));
        catalog.insert(arc("A", "B", 1.0));
        let keys: Vec<(&str, &str)> = catalog
            .iter()
            .map(|a| (a.origin.as_str(), a.destination.as_str()))
            .collect();
        assert_eq!(keys, [("A", "B"), ("A", "C"), ("B", "A")]);
        assert_eq!(catalog.outgoing("A").count(), 2);
        assert_eq!(catalog.outgoing("Z").count(), 0);
    }
}
