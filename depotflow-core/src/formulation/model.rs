//! Variables, linear constraints and assignments of the routing model.

use std::fmt;

use crate::{NodeId, VehicleId};

/// Index of a variable within its [`Formulation`](super::Formulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the variable in [`Formulation::variables`](super::Formulation::variables).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Integrality of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Takes the value 0 or 1.
    Binary,
    /// Real-valued within its bounds.
    Continuous,
}

/// What a variable stands for in the routing problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableRole {
    /// `x[k,i,j]`: vehicle traverses the arc.
    Traverse {
        /// Vehicle `k`.
        vehicle: VehicleId,
        /// Arc origin `i`.
        origin: NodeId,
        /// Arc destination `j`.
        destination: NodeId,
    },
    /// `y[k,i,j]`: load on board after leaving `i` towards `j`.
    Load {
        /// Vehicle `k`.
        vehicle: VehicleId,
        /// Arc origin `i`.
        origin: NodeId,
        /// Arc destination `j`.
        destination: NodeId,
    },
    /// `z[c,k]`: vehicle launches its route from the center.
    Launch {
        /// Center `c`.
        center: NodeId,
        /// Vehicle `k`.
        vehicle: VehicleId,
    },
    /// `u[k]`: vehicle is dispatched.
    Active {
        /// Vehicle `k`.
        vehicle: VehicleId,
    },
    /// `s[c]`: quantity shipped from the center.
    Supply {
        /// Center `c`.
        center: NodeId,
    },
}

/// A decision variable with bounds and objective coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Position in the formulation.
    pub id: VarId,
    /// Human-readable name, e.g. `x[V1,CD1,CL1]`.
    pub name: String,
    /// Integrality.
    pub kind: VariableKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Objective coefficient.
    pub objective: f64,
    /// Meaning of the variable.
    pub role: VariableRole,
}

/// `coefficient · variable`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTerm {
    /// Variable referenced by the term.
    pub var: VarId,
    /// Multiplier.
    pub coefficient: f64,
}

/// Relation between a constraint's activity and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    /// `activity ≤ rhs`.
    LessEqual,
    /// `activity = rhs`.
    Equal,
    /// `activity ≥ rhs`.
    GreaterEqual,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LessEqual => "<=",
            Self::Equal => "=",
            Self::GreaterEqual => ">=",
        })
    }
}

/// Constraint families of the routing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintFamily {
    /// Each client has exactly one inbound arc across the fleet.
    VisitIn,
    /// Each client has exactly one outbound arc across the fleet.
    VisitOut,
    /// A vehicle entering a client also leaves it.
    Continuity,
    /// A launched vehicle leaves its center once.
    StartAtCenter,
    /// A launched vehicle returns to its center once.
    EndAtCenter,
    /// A dispatched vehicle uses exactly one center.
    OneCenter,
    /// Load on a traversed arc is within vehicle capacity; zero otherwise.
    ArcCapacity,
    /// Load drops by the client's demand at each visit.
    FlowConservation,
    /// Vehicles arrive back at a center empty.
    ReturnEmpty,
    /// Supply of a center equals the load launched from it.
    CenterBalance,
    /// Supply of a center is within its capacity.
    CenterCapacity,
    /// Total supply equals total demand.
    SupplyCover,
    /// Route distance is within vehicle range.
    Range,
    /// Route travel and service time is within the duration limit.
    Duration,
    /// A binary variable lies within `[0, 1]`.
    ///
    /// Never emitted as a row; only [`Formulation::violations`](super::Formulation::violations)
    /// reports it.
    Bounds,
}

impl ConstraintFamily {
    /// Families of the explicit constraint rows, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::VisitIn,
        Self::VisitOut,
        Self::Continuity,
        Self::StartAtCenter,
        Self::EndAtCenter,
        Self::OneCenter,
        Self::ArcCapacity,
        Self::FlowConservation,
        Self::ReturnEmpty,
        Self::CenterBalance,
        Self::CenterCapacity,
        Self::SupplyCover,
        Self::Range,
        Self::Duration,
    ];
}

/// A linear constraint `Σ terms  sense  rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Human-readable name, e.g. `Range[V1]`.
    pub name: String,
    /// Family the constraint belongs to.
    pub family: ConstraintFamily,
    /// Left-hand side terms.
    pub terms: Vec<LinearTerm>,
    /// Relation to the right-hand side.
    pub sense: Sense,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Value of the left-hand side under `assignment`.
    #[must_use]
    pub fn activity(&self, assignment: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|term| term.coefficient * assignment.value(term.var))
            .sum()
    }

    /// Whether the constraint holds within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, assignment: &Assignment, tolerance: f64) -> bool {
        let activity = self.activity(assignment);
        match self.sense {
            Sense::LessEqual => activity <= self.rhs + tolerance,
            Sense::Equal => (activity - self.rhs).abs() <= tolerance,
            Sense::GreaterEqual => activity >= self.rhs - tolerance,
        }
    }
}

/// Dense vector of variable values, indexed by [`VarId`].
///
/// Variables outside the vector read as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// All `len` variables set to zero.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Wrap an existing value vector.
    #[must_use]
    pub const fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of `var`.
    #[must_use]
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Set the value of `var`. Ids beyond the vector are ignored.
    pub fn set(&mut self, var: VarId, value: f64) {
        if let Some(slot) = self.values.get_mut(var.index()) {
            *slot = value;
        }
    }

    /// Add `delta` to the value of `var`.
    pub fn add(&mut self, var: VarId, delta: f64) {
        if let Some(slot) = self.values.get_mut(var.index()) {
            *slot += delta;
        }
    }

    /// Raw values in variable order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// A constraint not satisfied by an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Name of the violated constraint.
    pub constraint: String,
    /// Its family.
    pub family: ConstraintFamily,
    /// Left-hand side value.
    pub activity: f64,
    /// Relation that failed.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: f64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.constraint, self.activity, self.sense, self.rhs
        )
    }
}
