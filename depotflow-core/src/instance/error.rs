use thiserror::Error;

/// Structural problems found while building an [`Instance`](super::Instance).
///
/// Every variant is fatal: the input data must be corrected before a model
/// can be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    /// Two records of the same entity type share an id.
    #[error("duplicate {entity} id {id}")]
    DuplicateId {
        /// Entity type, e.g. `"client"`.
        entity: &'static str,
        /// Repeated identifier.
        id: String,
    },
    /// A center and a client share an id.
    #[error("node id {id} is used by both a center and a client")]
    SharedNodeId {
        /// Conflicting identifier.
        id: String,
    },
    /// A field required to be positive was zero, negative or not finite.
    #[error("{entity} {id}: {field} must be positive (got {value})")]
    NonPositive {
        /// Entity type.
        entity: &'static str,
        /// Entity identifier.
        id: String,
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// A field required to be non-negative was negative or not finite.
    #[error("{entity} {id}: {field} must be non-negative (got {value})")]
    Negative {
        /// Entity type.
        entity: &'static str,
        /// Entity identifier.
        id: String,
        /// Offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// An arc names a node that is neither a center nor a client.
    #[error("arc {origin}->{destination} references unknown node {node}")]
    UnknownArcNode {
        /// Arc origin.
        origin: String,
        /// Arc destination.
        destination: String,
        /// The unknown node.
        node: String,
    },
    /// An arc starts and ends at the same node.
    #[error("self-arc at node {node}")]
    SelfArc {
        /// Node of the self-arc.
        node: String,
    },
    /// The same directed arc appears twice.
    #[error("duplicate arc {origin}->{destination}")]
    DuplicateArc {
        /// Arc origin.
        origin: String,
        /// Arc destination.
        destination: String,
    },
    /// An access rule names an unknown node.
    #[error("access rule references unknown node {node}")]
    UnknownAccessNode {
        /// The unknown node.
        node: String,
    },
    /// An access rule names an unknown vehicle.
    #[error("access rule references unknown vehicle {vehicle}")]
    UnknownAccessVehicle {
        /// The unknown vehicle.
        vehicle: String,
    },
    /// Two access rules for the same pair disagree.
    #[error("conflicting access rules for node {node} and vehicle {vehicle}")]
    ConflictingAccessRule {
        /// Node of the conflicting rules.
        node: String,
        /// Vehicle of the conflicting rules.
        vehicle: String,
    },
    /// A vehicle's home center is not a known center.
    #[error("vehicle {vehicle} has unknown home center {center}")]
    UnknownHomeCenter {
        /// Vehicle identifier.
        vehicle: String,
        /// Home center supplied.
        center: String,
    },
}
