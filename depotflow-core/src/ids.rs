//! String identifiers for network nodes and fleet vehicles.
//!
//! Identifiers order lexicographically, which is what every deterministic
//! tie-break in the planner relies on.

use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(String);

        impl $name {
            /// Construct an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier shared by distribution centers and clients.
    ///
    /// Centers and clients live in one node namespace, so an id names at most
    /// one node.
    ///
    /// # Examples
    /// ```
    /// use depotflow_core::NodeId;
    ///
    /// let id = NodeId::from("CD1");
    /// assert_eq!(id.as_str(), "CD1");
    /// assert!(NodeId::from("CL1") < NodeId::from("CL2"));
    /// ```
    NodeId
);

string_id!(
    /// Identifier of a fleet vehicle.
    VehicleId
);
