//! Assembly identity: the four-part version and references to other assemblies.

use std::{fmt, sync::Arc};

use crate::{
    metadata::{module::CompiledModule, token::Token},
    Result,
};

/// Four-part assembly version (`major.minor.build.revision`).
///
/// # Examples
///
/// ```rust
/// use dotpatch::metadata::identity::AssemblyVersion;
///
/// let version = AssemblyVersion::parse("1.4.0.0")?;
/// assert_eq!(version.major, 1);
/// assert_eq!(version.minor, 4);
/// assert_eq!(version.to_string(), "1.4.0.0");
/// # Ok::<(), dotpatch::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

impl AssemblyVersion {
    /// Version `0.0.0.0`, used when a module carries no version information.
    pub const UNKNOWN: Self = Self::new(0, 0, 0, 0);

    /// Create a version from its four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse a dotted version string with one to four components.
    ///
    /// Missing trailing components default to zero, so `"2.1"` parses as `2.1.0.0`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for empty input, more than four components or a
    /// component that is not a valid `u16`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(malformed_error!("Empty version string"));
        }

        let mut parts = [0u16; 4];
        for (index, part) in value.split('.').enumerate() {
            if index >= parts.len() {
                return Err(malformed_error!("Too many version components - {}", value));
            }

            let Ok(component) = part.parse::<u16>() else {
                return Err(malformed_error!(
                    "Invalid version component '{}' in {}",
                    part,
                    value
                ));
            };
            parts[index] = component;
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }

    /// Returns `true` for `0.0.0.0`.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.build == 0 && self.revision == 0
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// A reference from a module to another assembly.
///
/// The module loader resolves references it can find on disk and attaches the loaded
/// module; unresolved references keep only their name and version.
#[derive(Debug, Clone)]
pub struct AssemblyReference {
    /// Token of this reference in the owning module
    pub token: Token,
    /// Simple name of the referenced assembly
    pub name: String,
    /// Version requested by the reference
    pub version: AssemblyVersion,
    /// The loaded module, if the loader could resolve it
    pub resolved: Option<Arc<CompiledModule>>,
}

impl AssemblyReference {
    /// Returns the loaded module behind this reference, if any.
    #[must_use]
    pub fn module(&self) -> Option<&Arc<CompiledModule>> {
        self.resolved.as_ref()
    }
}
