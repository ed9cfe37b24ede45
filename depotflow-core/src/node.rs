//! Distribution centers and clients.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. They are
//! carried for reporting only; travel distances and times come from the arc
//! catalog.

use geo::Coord;

use crate::NodeId;

/// A distribution center vehicles are dispatched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Center {
    /// Unique node identifier.
    pub id: NodeId,
    /// Throughput capacity in demand units.
    pub capacity: f64,
    /// Geographic position.
    pub location: Coord<f64>,
}

/// A client that must be visited exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// Unique node identifier.
    pub id: NodeId,
    /// Quantity delivered on the visit.
    pub demand: f64,
    /// Geographic position.
    pub location: Coord<f64>,
    /// Hours spent at the client. Zero unless the instance supplies it.
    pub service_time: f64,
}

/// Whether a node is a center or a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Distribution center.
    Center,
    /// Delivery client.
    Client,
}

/// Borrowed view of any node in an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// A distribution center.
    Center(&'a Center),
    /// A delivery client.
    Client(&'a Client),
}

impl<'a> Node<'a> {
    /// Identifier of the node.
    #[must_use]
    pub const fn id(&self) -> &'a NodeId {
        match self {
            Self::Center(center) => &center.id,
            Self::Client(client) => &client.id,
        }
    }

    /// Geographic position of the node.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        match self {
            Self::Center(center) => center.location,
            Self::Client(client) => client.location,
        }
    }

    /// Kind of the node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Center(_) => NodeKind::Center,
            Self::Client(_) => NodeKind::Client,
        }
    }

    /// Demand delivered at the node; zero for centers.
    #[must_use]
    pub const fn demand(&self) -> f64 {
        match self {
            Self::Center(_) => 0.0,
            Self::Client(client) => client.demand,
        }
    }

    /// Service hours spent at the node; zero for centers.
    #[must_use]
    pub const fn service_time(&self) -> f64 {
        match self {
            Self::Center(_) => 0.0,
            Self::Client(client) => client.service_time,
        }
    }
}
