//! Patch configuration
//!
//! The build driver decides which processors run for a module and how loud their
//! diagnostics are. [`PatchConfig`] carries those decisions and turns them into a
//! [`ProcessorPipeline`] with a fixed order: identity rename first, then version stamping.

use crate::{
    diagnostics::Severity,
    metadata::module::DEFAULT_CONTAINER_EXTENSION,
    processors::{IdentityRenameProcessor, ProcessorPipeline, VersionStampProcessor},
    Error, Result,
};

/// Configuration for one patching run.
///
/// # Examples
///
/// ```rust
/// use dotpatch::{PatchConfig, Severity};
///
/// let config = PatchConfig::default()
///     .with_rename("Game.Client")
///     .with_revision("9f3e2a1")
///     .with_version_severity(Severity::Error);
///
/// let pipeline = config.build_pipeline()?;
/// assert_eq!(
///     pipeline.names().collect::<Vec<_>>(),
///     ["IdentityRenameProcessor", "VersionStampProcessor"]
/// );
/// # Ok::<(), dotpatch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// New module name, `None` to keep the current identity
    pub rename_to: Option<String>,

    /// Extension appended to the new name for the container file
    pub container_extension: String,

    /// Whether to stamp a per-build file version
    pub stamp_version: bool,

    /// Source-control revision for the file version, `"0"` when `None`
    pub revision: Option<String>,

    /// Severity of rename diagnostics
    pub rename_severity: Severity,

    /// Severity of version stamp diagnostics
    pub version_severity: Severity,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            rename_to: None,
            container_extension: DEFAULT_CONTAINER_EXTENSION.to_string(),
            stamp_version: true,
            revision: None,
            rename_severity: Severity::Warning,
            version_severity: Severity::Warning,
        }
    }
}

impl PatchConfig {
    /// Configuration that runs no processor.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            stamp_version: false,
            ..Self::default()
        }
    }

    /// Configuration that treats every patch diagnostic as an error.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            rename_severity: Severity::Error,
            version_severity: Severity::Error,
            ..Self::default()
        }
    }

    /// Renames the module to `name`.
    #[must_use]
    pub fn with_rename(mut self, name: impl Into<String>) -> Self {
        self.rename_to = Some(name.into());
        self
    }

    /// Sets the container extension used by the rename.
    #[must_use]
    pub fn with_container_extension(mut self, extension: impl Into<String>) -> Self {
        self.container_extension = extension.into();
        self
    }

    /// Enables or disables version stamping.
    #[must_use]
    pub fn with_version_stamp(mut self, enabled: bool) -> Self {
        self.stamp_version = enabled;
        self
    }

    /// Sets the source-control revision.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Sets the severity of rename diagnostics.
    #[must_use]
    pub fn with_rename_severity(mut self, severity: Severity) -> Self {
        self.rename_severity = severity;
        self
    }

    /// Sets the severity of version stamp diagnostics.
    #[must_use]
    pub fn with_version_severity(mut self, severity: Severity) -> Self {
        self.version_severity = severity;
        self
    }

    /// Checks the configuration for values no processor can work with.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] for an empty or whitespace rename target, a
    /// rename target containing a path separator or a control character, or an extension
    /// that is not empty and lacks a leading dot or contains a control character.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.rename_to {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfiguration(
                    "rename target is empty".to_string(),
                ));
            }

            if name.contains(['/', '\\']) {
                return Err(Error::InvalidConfiguration(format!(
                    "rename target '{name}' contains a path separator"
                )));
            }

            if name.chars().any(char::is_control) {
                return Err(Error::InvalidConfiguration(format!(
                    "rename target {name:?} contains a control character"
                )));
            }
        }

        if self.container_extension.chars().any(char::is_control) {
            return Err(Error::InvalidConfiguration(format!(
                "container extension {:?} contains a control character",
                self.container_extension
            )));
        }

        if !self.container_extension.is_empty() && !self.container_extension.starts_with('.') {
            return Err(Error::InvalidConfiguration(format!(
                "container extension '{}' must start with '.'",
                self.container_extension
            )));
        }

        Ok(())
    }

    /// Builds the pipeline described by this configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] if [`PatchConfig::validate`] fails.
    pub fn build_pipeline(&self) -> Result<ProcessorPipeline> {
        self.validate()?;

        let mut pipeline = ProcessorPipeline::new();
        if let Some(name) = &self.rename_to {
            pipeline.add(
                IdentityRenameProcessor::new(name.as_str())
                    .with_extension(self.container_extension.as_str())
                    .with_severity(self.rename_severity),
            );
        }

        if self.stamp_version {
            let mut stamp = VersionStampProcessor::new().with_severity(self.version_severity);
            if let Some(revision) = &self.revision {
                stamp = stamp.with_revision(revision.as_str());
            }
            pipeline.add(stamp);
        }

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let default = PatchConfig::default();
        assert!(default.rename_to.is_none());
        assert!(default.stamp_version);
        assert_eq!(default.container_extension, ".dll");
        assert_eq!(default.rename_severity, Severity::Warning);

        let disabled = PatchConfig::disabled();
        assert!(!disabled.stamp_version);
        assert!(disabled.build_pipeline().unwrap().is_empty());

        let strict = PatchConfig::strict();
        assert_eq!(strict.rename_severity, Severity::Error);
        assert_eq!(strict.version_severity, Severity::Error);
    }

    #[test]
    fn pipeline_order() {
        let pipeline = PatchConfig::default()
            .with_rename("Foo")
            .build_pipeline()
            .unwrap();
        assert_eq!(
            pipeline.names().collect::<Vec<_>>(),
            ["IdentityRenameProcessor", "VersionStampProcessor"]
        );

        let only_rename = PatchConfig::disabled()
            .with_rename("Foo")
            .build_pipeline()
            .unwrap();
        let names: Vec<_> = only_rename.names().collect();
        assert_eq!(names, ["IdentityRenameProcessor"]);

        let only_stamp = PatchConfig::default()
            .with_version_stamp(true)
            .build_pipeline()
            .unwrap();
        assert_eq!(only_stamp.len(), 1);
    }

    #[test]
    fn invalid_configurations() {
        for config in [
            PatchConfig::default().with_rename(""),
            PatchConfig::default().with_rename("   "),
            PatchConfig::default().with_rename("out/Foo"),
            PatchConfig::default().with_container_extension("dll"),
            PatchConfig::default().with_rename("Foo\nBar"),
            PatchConfig::default().with_rename("Foo\u{1b}[31m"),
            PatchConfig::default().with_container_extension(".d\tll"),
        ] {
            assert!(matches!(
                config.build_pipeline(),
                Err(Error::InvalidConfiguration(_))
            ));
        }

        assert!(PatchConfig::default()
            .with_rename("Foo")
            .with_container_extension("")
            .validate()
            .is_ok());
    }
}
