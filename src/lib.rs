// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a side-loaded symbol file into memory

//! # dotpatch
//!
//! Post-link metadata patching for compiled .NET modules.
//!
//! `dotpatch` runs as one stage of a build, after compilation and before packaging. It takes a
//! module that an external loader has already parsed into an editable [`CompiledModule`],
//! runs a fixed list of processors over it and reports every mutation as a build diagnostic.
//! When the module carries debug symbols, each diagnostic points at the source line that
//! produced the patched code.
//!
//! ## Features
//!
//! - **Processor contract** - Independent, idempotent mutations behind [`MetadataProcessor`]
//! - **Version stamping** - Per-build `AssemblyFileVersion` values traceable to a build
//! - **Identity rename** - Module name and container file renamed together
//! - **Source-anchored diagnostics** - Compiler-style lines such as
//!   `Player.cs(11,9,11,24): warning STRIDE001: ...`
//! - **Corruption tolerant** - Broken debug symbols cost a location, never a build
//!
//! ## Quick Start
//!
//! ```rust
//! use dotpatch::prelude::*;
//!
//! # fn load() -> CompiledModule { CompiledModule::new("Bar", AssemblyVersion::new(1, 4, 0, 0)) }
//! let mut module = load();
//! let mut build_log = Vec::new();
//!
//! let pipeline = PatchConfig::default()
//!     .with_rename("Foo")
//!     .with_version_stamp(false)
//!     .build_pipeline()?;
//!
//! let mut context = ModuleEditContext::new(&mut module, &mut build_log);
//! let changed = pipeline.run(&mut context)?;
//! assert!(changed);
//!
//! assert_eq!(
//!     String::from_utf8_lossy(&build_log).trim_end(),
//!     "warning STRIDE000: Renamed Bar (Module Bar.dll) to Foo (Module Foo.dll)."
//! );
//! # Ok::<(), dotpatch::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The editable module model, debug symbols and the source location resolver
//! - [`diagnostics`] - Diagnostic lines and the reporter writing them
//! - [`processors`] - The processor contract, the edit context, the pipeline and the built-in processors
//! - [`config`] - Driver configuration turned into a pipeline
//! - [`file`] - Symbol data backends and compressed integer codecs
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Errors for which
//! [`Error::is_fatal_precondition`] holds mean the module cannot be processed and the run
//! should stop without writing it back:
//!
//! ```rust
//! use dotpatch::prelude::*;
//!
//! let mut module = CompiledModule::new("Orphan", AssemblyVersion::new(1, 0, 0, 0));
//! let mut build_log = Vec::new();
//! let mut context = ModuleEditContext::new(&mut module, &mut build_log);
//!
//! match VersionStampProcessor::new().process(&mut context) {
//!     Err(error) if error.is_fatal_precondition() => println!("not patched: {error}"),
//!     Err(error) => println!("failed: {error}"),
//!     Ok(changed) => println!("changed: {changed}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger. Pipeline stages log
//! at `info`, ignored debug-symbol failures at `debug` and failed sink writes at `warn`.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotpatch::prelude::*;
///
/// let module = CompiledModule::new("Game", AssemblyVersion::new(1, 0, 0, 0));
/// let resolver = SourceLocationResolver::new(&module);
/// assert!(resolver.resolve(Token::new(0x0600_0001), None, true).is_none());
/// ```
pub mod prelude;

/// Symbol data sources and binary codecs
///
/// Debug symbols either arrive in memory or are memory-mapped from a side-loaded file. Both are
/// served through the [`file::Backend`] trait and read with the bounds-checked [`file::Parser`].
pub mod file;

/// Editable metadata model of a compiled module
///
/// # Key Components
///
/// - [`metadata::module::CompiledModule`] - The module: identity, attributes, types, methods
/// - [`metadata::symbols::DebugSymbolStore`] - Optional per-method sequence points
/// - [`metadata::resolver::SourceLocationResolver`] - Instruction to source mapping
/// - [`metadata::token`] - Stable record identifiers
pub mod metadata;

/// Build diagnostics for metadata patches
pub mod diagnostics;

/// Metadata processors, the edit context and the processor pipeline
pub mod processors;

/// Configuration consumed from the build driver
pub mod config;

/// `dotpatch` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotpatch` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use dotpatch::Error;
///
/// let error = Error::MissingFoundationLibrary("Game".to_string());
/// assert!(error.is_fatal_precondition());
/// assert_eq!(error.to_string(), "Missing foundation library from module 'Game'");
/// ```
pub use error::Error;

/// Patch configuration
pub use config::PatchConfig;

/// Diagnostic types
pub use diagnostics::{Diagnostic, DiagnosticReporter, PatchReport, Severity};

/// The editable module
pub use metadata::module::CompiledModule;

/// Processor contract, context and pipeline
pub use processors::{MetadataProcessor, ModuleEditContext, ProcessorPipeline};
