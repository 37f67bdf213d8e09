//! Per-build file-version stamping.
//!
//! [`VersionStampProcessor`] keeps exactly one `AssemblyFileVersionAttribute` record on the
//! module and refreshes its value on every build, so a shipped binary can be traced back to
//! the build and revision that produced it.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    diagnostics::{Diagnostic, Severity},
    metadata::{
        customattributes::{attribute_short_name, AttributeArgument, AttributeRecord},
        identity::AssemblyVersion,
    },
    processors::{MetadataProcessor, ModuleEditContext},
    Result,
};

/// Full name of the file-version attribute.
pub const FILE_VERSION_ATTRIBUTE: &str = "System.Reflection.AssemblyFileVersionAttribute";

/// Revision used when no source-control revision is known.
const UNKNOWN_REVISION: &str = "0";

/// Seconds since the Unix epoch, or 0 if the clock is set before it.
#[must_use]
pub fn unix_build_counter() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Stamps `{major}.{minor}.{build}.{revision}` into the module's file-version attribute.
///
/// Major and minor come from the module's semantic version, which is left untouched. The
/// build component is a wall-clock counter in seconds, so builds more than a second apart get
/// distinct values and two runs within the same second produce the same module. The revision
/// identifies the source-control revision being built.
///
/// # Examples
///
/// ```rust
/// use dotpatch::prelude::*;
///
/// let stamp = VersionStampProcessor::new()
///     .with_revision("a1b2c3d")
///     .with_build_counter(|| 1_700_000_000);
/// assert_eq!(
///     stamp.file_version(AssemblyVersion::new(1, 4, 9, 9)),
///     "1.4.1700000000.a1b2c3d"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct VersionStampProcessor {
    revision: String,
    severity: Severity,
    build_counter: fn() -> u64,
}

impl Default for VersionStampProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStampProcessor {
    /// Create a processor with revision `"0"`, warning severity and the Unix-seconds counter.
    #[must_use]
    pub fn new() -> Self {
        VersionStampProcessor {
            revision: UNKNOWN_REVISION.to_string(),
            severity: Severity::Warning,
            build_counter: unix_build_counter,
        }
    }

    /// Sets the source-control revision; an empty revision keeps `"0"`.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        self.revision = if revision.trim().is_empty() {
            UNKNOWN_REVISION.to_string()
        } else {
            revision.trim().to_string()
        };
        self
    }

    /// Sets the severity of the reported diagnostics.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Replaces the build counter source.
    #[must_use]
    pub fn with_build_counter(mut self, build_counter: fn() -> u64) -> Self {
        self.build_counter = build_counter;
        self
    }

    /// The configured revision.
    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Computes the file version for a module with semantic version `version`.
    #[must_use]
    pub fn file_version(&self, version: AssemblyVersion) -> String {
        format!(
            "{}.{}.{}.{}",
            version.major,
            version.minor,
            (self.build_counter)(),
            self.revision
        )
    }

    fn render(value: &str) -> String {
        format!(
            "[{}(\"{}\")]",
            attribute_short_name(FILE_VERSION_ATTRIBUTE),
            value
        )
    }
}

impl MetadataProcessor for VersionStampProcessor {
    fn name(&self) -> &'static str {
        "VersionStampProcessor"
    }

    fn process(&self, context: &mut ModuleEditContext<'_>) -> Result<bool> {
        context.resolve_foundation_library()?;

        let value = self.file_version(context.module().version());
        let existing = context
            .module_mut()
            .attributes_mut()
            .find_mut(FILE_VERSION_ATTRIBUTE)
            .map(|record| {
                let old = record
                    .fixed_args
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                record.fixed_args = vec![AttributeArgument::from(value.as_str())];
                old
            });

        let message = match existing {
            Some(old) => format!(
                "Modified {} to {}",
                Self::render(&old),
                Self::render(&value)
            ),
            None => {
                let constructor = context.import_constructor(FILE_VERSION_ATTRIBUTE, 1)?;
                context
                    .module_mut()
                    .attributes_mut()
                    .push(AttributeRecord::new(
                        FILE_VERSION_ATTRIBUTE,
                        constructor,
                        vec![AttributeArgument::from(value.as_str())],
                    ));
                format!("Added {}", Self::render(&value))
            }
        };

        context.report(
            &Diagnostic::new(self.severity, message).with_origin(self.name(), "process"),
        );
        Ok(true)
    }

    fn description(&self) -> &'static str {
        "Stamps a per-build file version into the module attributes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::token::TableId,
        test::{
            factories::{game_module, isolated_module},
            lines,
        },
        Error,
    };

    fn stamp_at(seconds: fn() -> u64) -> VersionStampProcessor {
        VersionStampProcessor::new().with_build_counter(seconds)
    }

    fn file_versions(module: &crate::metadata::module::CompiledModule) -> Vec<String> {
        module
            .attributes()
            .iter()
            .filter(|record| record.is(FILE_VERSION_ATTRIBUTE))
            .map(|record| record.fixed_args[0].to_string())
            .collect()
    }

    #[test]
    fn adds_record_when_missing() {
        let mut module = game_module("Game", AssemblyVersion::new(1, 4, 0, 0));
        let mut sink = Vec::new();
        {
            let mut context = ModuleEditContext::new(&mut module, &mut sink);
            assert!(stamp_at(|| 1_000).process(&mut context).unwrap());
        }

        assert_eq!(file_versions(&module), ["1.4.1000.0"]);
        let record = module.attributes().find(FILE_VERSION_ATTRIBUTE).unwrap();
        assert_eq!(record.constructor, TableId::MemberRef.token(1));
        assert_eq!(module.version(), AssemblyVersion::new(1, 4, 0, 0));
        assert_eq!(
            lines(&sink),
            ["warning STRIDE000: Added [System.Reflection.AssemblyFileVersion(\"1.4.1000.0\")]."]
        );
    }

    #[test]
    fn replaces_existing_record() {
        let mut module = game_module("Game", AssemblyVersion::new(2, 7, 3, 1));
        let mut sink = Vec::new();
        {
            let mut context = ModuleEditContext::new(&mut module, &mut sink);
            let first = VersionStampProcessor::new()
                .with_revision("abc123")
                .with_build_counter(|| 1_000);
            let second = VersionStampProcessor::new()
                .with_revision("abc123")
                .with_build_counter(|| 1_001)
                .with_severity(Severity::Error);
            assert!(first.process(&mut context).unwrap());
            assert!(second.process(&mut context).unwrap());
        }

        assert_eq!(file_versions(&module), ["2.7.1001.abc123"]);
        assert_eq!(module.member_refs().len(), 1);
        assert_eq!(
            lines(&sink)[1],
            "error STRIDE000: Modified \
             [System.Reflection.AssemblyFileVersion(\"2.7.1000.abc123\")] to \
             [System.Reflection.AssemblyFileVersion(\"2.7.1001.abc123\")]."
        );
    }

    #[test]
    fn same_second_is_stable() {
        let mut module = game_module("Game", AssemblyVersion::new(1, 0, 0, 0));
        let mut sink = Vec::new();
        let mut context = ModuleEditContext::new(&mut module, &mut sink);
        let stamp = stamp_at(|| 42);

        stamp.process(&mut context).unwrap();
        stamp.process(&mut context).unwrap();
        assert_eq!(file_versions(context.module()), ["1.0.42.0"]);
    }

    #[test]
    fn missing_foundation_library_is_fatal() {
        let mut module = isolated_module("Lonely");
        let mut sink = Vec::new();
        {
            let mut context = ModuleEditContext::new(&mut module, &mut sink);
            let error = stamp_at(|| 1).process(&mut context).unwrap_err();
            assert!(matches!(error, Error::MissingFoundationLibrary(_)));
        }

        assert!(module.attributes().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn revision_defaults() {
        let blank = VersionStampProcessor::new().with_revision("  ");
        let padded = VersionStampProcessor::new().with_revision(" f00d ");

        assert_eq!(VersionStampProcessor::new().revision(), "0");
        assert_eq!(blank.revision(), "0");
        assert_eq!(padded.revision(), "f00d");
    }

    #[test]
    fn unix_counter_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_build_counter() > 1_577_836_800);
    }
}
