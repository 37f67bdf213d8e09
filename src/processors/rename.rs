//! Module identity renaming.
//!
//! [`IdentityRenameProcessor`] moves a module to a new logical name and container file name in
//! one step, so the two can never disagree after a run.

use crate::{
    diagnostics::{Diagnostic, Severity},
    metadata::module::DEFAULT_CONTAINER_EXTENSION,
    processors::{MetadataProcessor, ModuleEditContext},
    Result,
};

/// Renames a module and its primary container to a configured target.
///
/// The module ends up named `target` inside `target + extension`. A module already in that
/// state is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRenameProcessor {
    target: String,
    extension: String,
    severity: Severity,
}

impl IdentityRenameProcessor {
    /// Create a processor renaming to `target` with the `.dll` container extension.
    pub fn new(target: impl Into<String>) -> Self {
        IdentityRenameProcessor {
            target: target.into(),
            extension: DEFAULT_CONTAINER_EXTENSION.to_string(),
            severity: Severity::Warning,
        }
    }

    /// Sets the container extension, including its leading dot.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the severity of the reported diagnostic.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Target module name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Target container file name.
    #[must_use]
    pub fn container_target(&self) -> String {
        format!("{}{}", self.target, self.extension)
    }
}

impl MetadataProcessor for IdentityRenameProcessor {
    fn name(&self) -> &'static str {
        "IdentityRenameProcessor"
    }

    fn process(&self, context: &mut ModuleEditContext<'_>) -> Result<bool> {
        let container = self.container_target();
        let module = context.module();
        if module.name() == self.target && module.container_name() == container {
            return Ok(false);
        }

        let (old_name, old_container) = context
            .module_mut()
            .rename(self.target.as_str(), container.as_str());

        let message = format!(
            "Renamed {} (Module {}) to {} (Module {})",
            old_name, old_container, self.target, container
        );
        context.report(
            &Diagnostic::new(self.severity, message).with_origin(self.name(), "process"),
        );
        Ok(true)
    }

    fn description(&self) -> &'static str {
        "Renames the module and its primary container"
    }
}
