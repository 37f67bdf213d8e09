//! Ordered execution of processors over one module.
//!
//! Stages are logged at `info` as they start. A failing stage is logged at `error` and ends
//! the run.

use std::fmt;

use crate::{
    processors::{MetadataProcessor, ModuleEditContext},
    Result,
};

/// Runs processors in insertion order over one module.
///
/// The first failing processor stops the pipeline; its error is returned unchanged so the
/// driver can decide not to write the module back.
#[derive(Default)]
pub struct ProcessorPipeline {
    processors: Vec<Box<dyn MetadataProcessor>>,
}

impl fmt::Debug for ProcessorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ProcessorPipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        ProcessorPipeline {
            processors: Vec::new(),
        }
    }

    /// Appends a processor.
    pub fn add(&mut self, processor: impl MetadataProcessor + 'static) -> &mut Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Appends a processor, builder style.
    #[must_use]
    pub fn with(mut self, processor: impl MetadataProcessor + 'static) -> Self {
        self.add(processor);
        self
    }

    /// Number of processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns `true` if there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor names in run order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.processors.iter().map(|processor| processor.name())
    }

    /// Runs every processor once and returns `true` if any of them changed the module.
    ///
    /// # Errors
    ///
    /// Returns the error of the first processor that fails; later processors do not run.
    pub fn run(&self, context: &mut ModuleEditContext<'_>) -> Result<bool> {
        let mut changed = false;

        for processor in &self.processors {
            log::info!(
                "Running {} on '{}' - {}",
                processor.name(),
                context.module().name(),
                processor.description()
            );

            match processor.process(context) {
                Ok(result) => {
                    log::debug!("{} finished (changed: {})", processor.name(), result);
                    changed |= result;
                }
                Err(error) => {
                    log::error!("{} failed: {}", processor.name(), error);
                    return Err(error);
                }
            }
        }

        Ok(changed)
    }
}
