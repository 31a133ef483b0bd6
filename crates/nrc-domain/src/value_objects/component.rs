//! References to components named by a client declaration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a fallback or fallback-factory type named in a declaration
///
/// Declarations are attribute bags produced by a registration collaborator,
/// so they carry the referenced type by name together with whether that type
/// is abstract. The instance itself is resolved from the client's scope under
/// `type_name` when the client is bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    /// Qualifier the instance is registered under in the client scope
    pub type_name: String,
    /// The referenced type is an interface rather than a concrete type
    pub is_interface: bool,
}

impl ComponentRef {
    /// Reference a concrete implementation
    pub fn concrete<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            is_interface: false,
        }
    }

    /// Reference an abstract interface type
    pub fn interface<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            is_interface: true,
        }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name)
    }
}
