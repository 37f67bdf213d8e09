//! Method definitions owned by a module and member references imported into it.

mod body;
mod types;

pub use body::{Instruction, MethodBody, Operand};
pub use types::{MethodAttributes, MethodParameter};

use crate::metadata::token::Token;

/// Name shared by all instance constructors.
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// A method defined in a module.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// Token of this method (`MethodDef` table)
    pub token: Token,
    /// Simple method name
    pub name: String,
    /// Token of the declaring type (`TypeDef` table)
    pub declaring_type: Token,
    /// Method attribute flags
    pub flags: MethodAttributes,
    /// Declared parameters, excluding `this`
    pub params: Vec<MethodParameter>,
    /// IL body, absent for abstract and runtime-provided methods
    pub body: Option<MethodBody>,
}

impl MethodDefinition {
    /// Returns `true` for instance constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
            && self.flags.contains(MethodAttributes::RT_SPECIAL_NAME)
            && !self.flags.contains(MethodAttributes::STATIC)
    }

    /// Renders `Name(ParamType, ...)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.type_name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A reference to a member defined in another assembly.
///
/// Member references are how a module uses constructors and methods it does not define;
/// attribute records built by processors point at these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberReference {
    /// Token of this reference (`MemberRef` table)
    pub token: Token,
    /// Simple name of the assembly defining the member
    pub scope: String,
    /// Full name of the declaring type
    pub declaring_type: String,
    /// Member name
    pub name: String,
    /// Parameter type full names
    pub parameter_types: Vec<String>,
}

impl MemberReference {
    /// Returns `true` if this reference names the same member as the given parts.
    #[must_use]
    pub fn matches(
        &self,
        scope: &str,
        declaring_type: &str,
        name: &str,
        parameter_types: &[String],
    ) -> bool {
        self.scope == scope
            && self.declaring_type == declaring_type
            && self.name == name
            && self.parameter_types == parameter_types
    }

    /// Renders `[Scope]Namespace.Type::Name(ParamType, ...)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "[{}]{}::{}({})",
            self.scope,
            self.declaring_type,
            self.name,
            self.parameter_types.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::token::TableId;

    #[test]
    fn constructor_detection() {
        let mut method = MethodDefinition {
            token: TableId::MethodDef.token(1),
            name: CONSTRUCTOR_NAME.to_string(),
            declaring_type: TableId::TypeDef.token(1),
            flags: MethodAttributes::instance_constructor(),
            params: vec![MethodParameter::new("version", "System.String")],
            body: None,
        };
        assert!(method.is_constructor());
        assert_eq!(method.signature(), ".ctor(System.String)");

        method.flags |= MethodAttributes::STATIC;
        assert!(!method.is_constructor());

        method.flags = MethodAttributes::PUBLIC;
        assert!(!method.is_constructor());
    }

    #[test]
    fn member_reference_names() {
        let reference = MemberReference {
            token: TableId::MemberRef.token(1),
            scope: "System.Runtime".to_string(),
            declaring_type: "System.Reflection.AssemblyFileVersionAttribute".to_string(),
            name: CONSTRUCTOR_NAME.to_string(),
            parameter_types: vec!["System.String".to_string()],
        };

        assert_eq!(
            reference.full_name(),
            "[System.Runtime]System.Reflection.AssemblyFileVersionAttribute::.ctor(System.String)"
        );
        assert!(reference.matches(
            "System.Runtime",
            "System.Reflection.AssemblyFileVersionAttribute",
            CONSTRUCTOR_NAME,
            &["System.String".to_string()]
        ));
        assert!(!reference.matches(
            "System.Runtime",
            "System.Reflection.AssemblyFileVersionAttribute",
            CONSTRUCTOR_NAME,
            &[]
        ));
    }
}
