//! Type definitions owned by a module.

use crate::metadata::token::Token;

/// Full name of the root object type; the library defining it is the foundation library.
pub const ROOT_OBJECT_TYPE: &str = "System.Object";

/// A type defined in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// Token of this type (`TypeDef` table)
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple type name
    pub name: String,
    /// Methods declared by this type, in declaration order
    pub methods: Vec<Token>,
}

impl TypeDefinition {
    /// Returns `Namespace.Name`, or just `Name` in the global namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns `true` if `full_name` names this type.
    #[must_use]
    pub fn is(&self, full_name: &str) -> bool {
        if self.namespace.is_empty() {
            return self.name == full_name;
        }

        full_name
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|name| name == self.name)
    }
}
