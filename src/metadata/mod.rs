//! Editable metadata model of a compiled .NET module.
//!
//! The external loader parses a binary container into a [`module::CompiledModule`]; processors
//! inspect and rewrite it through a [`crate::ModuleEditContext`]; the external writer serializes
//! it back. Everything here is a plain in-memory representation: records live in arenas and
//! are addressed by [`token::Token`]s.
//!
//! # Key Components
//!
//! - [`module`] - The module itself: identity, attribute records, types, methods, references
//! - [`customattributes`] - Module-level attribute records and their arguments
//! - [`method`] - Method definitions, bodies and imported member references
//! - [`typesystem`] - Type definitions
//! - [`identity`] - Assembly versions and references
//! - [`symbols`] - Optional debug-symbol store attached to a module
//! - [`sequencepoints`] - Sequence point blobs and source locations
//! - [`resolver`] - Instruction position to source location mapping
//! - [`token`] - Stable record identifiers
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::metadata::{identity::AssemblyVersion, module::CompiledModule};
//!
//! let mut module = CompiledModule::new("Game", AssemblyVersion::parse("1.4")?);
//! module.rename("Game.Client", "Game.Client.dll");
//! assert_eq!(module.version().to_string(), "1.4.0.0");
//! # Ok::<(), dotpatch::Error>(())
//! ```

/// Module-level metadata attribute records
pub mod customattributes;
/// Assembly versions and references to other assemblies
pub mod identity;
/// Method definitions, bodies and member references
pub mod method;
/// The editable module
pub mod module;
/// Source location lookup for diagnostics
pub mod resolver;
/// Sequence point decoding and encoding
pub mod sequencepoints;
/// Debug-symbol storage
pub mod symbols;
/// Commonly used metadata token type
pub mod token;
/// Type definitions
pub mod typesystem;
