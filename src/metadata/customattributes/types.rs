//! Attribute record and argument types.
//!
//! These mirror the decoded form of an ECMA-335 II.23.3 attribute blob: an ordered list of
//! fixed (constructor) arguments. Named arguments are not modelled since none of the
//! well-known records patched by this crate use them.

use std::fmt;

use crate::metadata::token::Token;

/// Represents a single fixed argument of an attribute record
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArgument {
    /// Null reference (a `null` string or type argument)
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value (16-bit Unicode)
    Char(char),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string
    String(String),
    /// Type reference (as full name)
    Type(String),
    /// Array of arguments
    Array(Vec<AttributeArgument>),
}

impl AttributeArgument {
    /// Returns the string payload of a [`AttributeArgument::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeArgument::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeArgument::Null => Ok(()),
            AttributeArgument::Bool(value) => write!(f, "{value}"),
            AttributeArgument::Char(value) => write!(f, "{value}"),
            AttributeArgument::I4(value) => write!(f, "{value}"),
            AttributeArgument::U4(value) => write!(f, "{value}"),
            AttributeArgument::I8(value) => write!(f, "{value}"),
            AttributeArgument::R8(value) => write!(f, "{value}"),
            AttributeArgument::String(value) | AttributeArgument::Type(value) => {
                write!(f, "{value}")
            }
            AttributeArgument::Array(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for AttributeArgument {
    fn from(value: &str) -> Self {
        AttributeArgument::String(value.to_string())
    }
}

impl From<String> for AttributeArgument {
    fn from(value: String) -> Self {
        AttributeArgument::String(value)
    }
}

/// A metadata attribute record attached to the module.
///
/// `attribute_type` is the full name of the attribute class; `constructor` is the token of
/// the constructor used to instantiate it (a local method definition or an imported member
/// reference).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord {
    /// Full name of the attribute type, e.g. `System.Reflection.AssemblyFileVersionAttribute`
    pub attribute_type: String,
    /// Constructor used by this record
    pub constructor: Token,
    /// Fixed arguments from the constructor signature
    pub fixed_args: Vec<AttributeArgument>,
}

impl AttributeRecord {
    /// Create a new attribute record.
    pub fn new(
        attribute_type: impl Into<String>,
        constructor: Token,
        fixed_args: Vec<AttributeArgument>,
    ) -> Self {
        AttributeRecord {
            attribute_type: attribute_type.into(),
            constructor,
            fixed_args,
        }
    }

    /// Returns `true` if this record instantiates `attribute_type`.
    #[must_use]
    pub fn is(&self, attribute_type: &str) -> bool {
        self.attribute_type == attribute_type
    }

    /// Attribute name without the conventional `Attribute` suffix, as written in source.
    #[must_use]
    pub fn short_name(&self) -> &str {
        attribute_short_name(&self.attribute_type)
    }
}

/// Strips the conventional `Attribute` suffix from an attribute type name.
#[must_use]
pub fn attribute_short_name(attribute_type: &str) -> &str {
    attribute_type
        .strip_suffix("Attribute")
        .filter(|name| !name.is_empty() && !name.ends_with('.'))
        .unwrap_or(attribute_type)
}
