//! # dotpatch Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotpatch library. Import this module to get quick access to everything a build
//! driver needs to run processors over a module.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotpatch operations
pub use crate::Error;

/// The result type used throughout dotpatch
pub use crate::Result;

/// Configuration consumed from the build driver
pub use crate::config::PatchConfig;

// ================================================================================================
// Processors
// ================================================================================================

/// Processor contract, context and pipeline
pub use crate::processors::{MetadataProcessor, ModuleEditContext, ProcessorPipeline};

/// Built-in processors
pub use crate::processors::{IdentityRenameProcessor, VersionStampProcessor};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Diagnostic lines and their reporter
pub use crate::diagnostics::{Diagnostic, DiagnosticReporter, PatchReport, RawInstruction, Severity};

// ================================================================================================
// Metadata Model
// ================================================================================================

/// The editable module and its identity
pub use crate::metadata::{
    identity::{AssemblyReference, AssemblyVersion},
    module::CompiledModule,
};

/// Metadata token types for referencing records
pub use crate::metadata::token::{TableId, Token};

/// Attribute records
pub use crate::metadata::customattributes::{AttributeArgument, AttributeList, AttributeRecord};

/// Methods and bodies
pub use crate::metadata::method::{
    Instruction, MethodAttributes, MethodBody, MethodParameter, Operand,
};

// ================================================================================================
// Debug Symbols
// ================================================================================================

/// Debug-symbol store and source locations
pub use crate::metadata::{
    resolver::SourceLocationResolver,
    sequencepoints::{SequencePoint, SourceLocation},
    symbols::{DebugSymbolStore, DebugSymbolStoreBuilder},
};
