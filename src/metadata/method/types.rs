//! Method attribute flags and parameter descriptions.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method attribute flags (ECMA-335 II.23.1.10), the subset the module model uses
    pub struct MethodAttributes: u16 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by everyone in the assembly
        const ASSEMBLY = 0x0003;
        /// Accessible by everyone
        const PUBLIC = 0x0006;
        /// Defined on the type, not per instance
        const STATIC = 0x0010;
        /// Virtual dispatch
        const VIRTUAL = 0x0040;
        /// Hidden by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Name carries special meaning
        const SPECIAL_NAME = 0x0800;
        /// Name carries special meaning to the runtime (constructors)
        const RT_SPECIAL_NAME = 0x1000;
    }
}

impl MethodAttributes {
    /// Flags a compiler emits for a public instance constructor.
    #[must_use]
    pub fn instance_constructor() -> Self {
        Self::PUBLIC | Self::HIDE_BY_SIG | Self::SPECIAL_NAME | Self::RT_SPECIAL_NAME
    }
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    /// Parameter name
    pub name: String,
    /// Full name of the parameter type, e.g. `System.String`
    pub type_name: String,
}

impl MethodParameter {
    /// Create a parameter description.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        MethodParameter {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}
