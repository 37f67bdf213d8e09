//! Metadata processors and the pipeline that runs them.
//!
//! A processor performs one idempotent mutation of a [`crate::metadata::module::CompiledModule`]
//! through a [`ModuleEditContext`] and reports whether anything changed. Processors do not
//! share state with each other; everything they need comes in through the context.
//!
//! # Key Components
//!
//! - [`MetadataProcessor`] - The processor contract
//! - [`ModuleEditContext`] - Module plus diagnostic sink for one run, with resolution helpers
//! - [`ProcessorPipeline`] - Ordered list of processors run over one context
//! - [`VersionStampProcessor`] - Stamps a per-build file version
//! - [`IdentityRenameProcessor`] - Renames the module and its container
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::prelude::*;
//!
//! let mut module = CompiledModule::new("Bar", AssemblyVersion::new(1, 0, 0, 0));
//! let mut log = Vec::new();
//! let mut context = ModuleEditContext::new(&mut module, &mut log);
//!
//! let pipeline = ProcessorPipeline::new().with(IdentityRenameProcessor::new("Foo"));
//! assert!(pipeline.run(&mut context)?);
//! assert!(!pipeline.run(&mut context)?);
//! assert_eq!(context.diagnostics_emitted(), 1);
//! drop(context);
//!
//! assert_eq!(module.container_name(), "Foo.dll");
//! # Ok::<(), dotpatch::Error>(())
//! ```

mod context;
mod pipeline;
mod rename;
mod version;

pub use context::{ModuleEditContext, ResolvedType};
pub use pipeline::ProcessorPipeline;
pub use rename::IdentityRenameProcessor;
pub use version::{unix_build_counter, VersionStampProcessor, FILE_VERSION_ATTRIBUTE};

use crate::Result;

/// A single metadata mutation over a module.
///
/// All processors must be thread-safe (Send + Sync) so a driver can hold them across threads;
/// a single run still calls them one at a time with exclusive access to the context.
///
/// # Contract
///
/// - Running a processor twice in a row leaves the module as the first run left it, and the
///   second run returns `Ok(false)` when nothing further changed.
/// - `Ok(false)` is the normal outcome when the target state already holds; it needs no
///   diagnostic.
/// - A module that cannot be processed (missing foundation library, missing constructor) is an
///   `Err`, which aborts the run.
pub trait MetadataProcessor: Send + Sync {
    /// Unique name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Applies the mutation.
    ///
    /// Returns `true` if the module was changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition of the module does not hold.
    fn process(&self, context: &mut ModuleEditContext<'_>) -> Result<bool>;

    /// Get a description of what this processor does.
    fn description(&self) -> &'static str {
        "No description available"
    }
}
