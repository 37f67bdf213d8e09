//! Build diagnostics for metadata patches.
//!
//! Every mutation a processor makes is reported as one line on the run's sink, in the
//! convention build tools already parse for compiler output:
//!
//! ```text
//! {location}{severity} {code}: {message}{il_fallback}{additional_info}.
//! ```
//!
//! - `location` is `doc(sl,sc,el,ec): ` when the instruction maps to source, otherwise empty
//! - `il_fallback` is ` at IL####: opcode operand`, only used without a location
//! - `additional_info` is a space followed by free text, or empty
//!
//! Rendering cannot fail; absent fields are left out. Control characters in any rendered
//! field are written as spaces, so a diagnostic never spans more than one line. A sink that rejects writes is logged
//! and otherwise ignored so reporting never aborts a run.
//!
//! # Examples
//!
//! ```rust
//! use dotpatch::diagnostics::{Diagnostic, Severity};
//!
//! let diagnostic = Diagnostic::new(Severity::Warning, "X patched Y");
//! assert_eq!(diagnostic.to_string(), "warning STRIDE000: X patched Y.");
//! ```

use std::{
    fmt::{self, Write as _},
    io::{self, Write},
};

use strum::{Display, EnumString};

use crate::metadata::{
    method::Instruction, module::CompiledModule, resolver::SourceLocationResolver,
    sequencepoints::SourceLocation, token::Token,
};

/// Code used when a diagnostic carries none.
pub const DEFAULT_CODE: &str = "STRIDE000";

/// Code of "processor patched method" diagnostics.
pub const PATCHED_CODE: &str = "STRIDE001";

/// Caller name used when a diagnostic does not name one.
pub const DEFAULT_CALLER: &str = "process";

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Fails the build in tools that treat errors as fatal
    Error,
    /// Informational for the build
    #[default]
    Warning,
}

/// Raw instruction text used when no source location is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstruction {
    /// IL offset of the instruction
    pub offset: u32,
    /// Instruction mnemonic
    pub opcode: String,
    /// Rendered operand, if the instruction has one
    pub operand: Option<String>,
}

impl From<&Instruction> for RawInstruction {
    fn from(instruction: &Instruction) -> Self {
        RawInstruction {
            offset: instruction.offset,
            opcode: instruction.mnemonic.to_string(),
            operand: instruction.operand.as_string(),
        }
    }
}

impl fmt::Display for RawInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IL{:04x}: {}", self.offset, self.opcode)?;
        if let Some(operand) = &self.operand {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

/// Text written with control characters replaced by spaces.
struct SingleLine<'a>(&'a str);

impl fmt::Display for SingleLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            f.write_char(if c.is_control() { ' ' } else { c })?;
        }
        Ok(())
    }
}

/// One diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostic {
    /// Severity keyword
    pub severity: Severity,
    /// Diagnostic code, [`DEFAULT_CODE`] when `None`
    pub code: Option<String>,
    /// Name of the reporting processor
    pub processor: String,
    /// Name of the reporting operation inside the processor
    pub caller: String,
    /// Free-text message
    pub message: String,
    /// Source location the diagnostic is anchored to
    pub location: Option<SourceLocation>,
    /// Raw instruction fallback when there is no location
    pub instruction: Option<RawInstruction>,
    /// Trailing free text
    pub additional_info: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with a message and default code.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            caller: DEFAULT_CALLER.to_string(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Names the processor and operation that produced this diagnostic.
    #[must_use]
    pub fn with_origin(mut self, processor: impl Into<String>, caller: impl Into<String>) -> Self {
        self.processor = processor.into();
        self.caller = caller.into();
        self
    }

    /// Sets the diagnostic code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Anchors the diagnostic to a source location.
    #[must_use]
    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    /// Sets the raw instruction fallback.
    #[must_use]
    pub fn with_instruction(mut self, instruction: Option<RawInstruction>) -> Self {
        self.instruction = instruction;
        self
    }

    /// Appends free text after the message.
    #[must_use]
    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    /// The effective diagnostic code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or(DEFAULT_CODE)
    }

    /// The effective message; an empty message names the origin instead.
    #[must_use]
    pub fn message(&self) -> String {
        if self.message.is_empty() {
            format!("'{}.{}' made a patch", self.processor, self.caller)
        } else {
            self.message.clone()
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{}: ", SingleLine(&location.to_string()))?;
        }

        let message = self.message();
        write!(
            f,
            "{} {}: {}",
            self.severity,
            SingleLine(self.code()),
            SingleLine(&message)
        )?;

        if self.location.is_none() {
            if let Some(instruction) = &self.instruction {
                write!(f, " at {}", SingleLine(&instruction.to_string()))?;
            }
        }

        let info = self.additional_info.as_deref().unwrap_or_default();
        if !info.is_empty() {
            write!(f, " {}", SingleLine(info))?;
        }

        write!(f, ".")
    }
}

/// A "processor patched this method" report, resolved into a [`Diagnostic`] by
/// [`DiagnosticReporter::patched`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Name of the reporting processor
    pub processor: String,
    /// Name of the reporting operation
    pub caller: String,
    /// The patched method (`MethodDef`, or a `MemberRef` into the same module)
    pub method: Token,
    /// IL offset of the patched instruction
    pub position: Option<u32>,
    /// Fall back to the nearest preceding location when the position has none
    pub allow_nearest: bool,
    /// Severity keyword
    pub severity: Severity,
    /// Diagnostic code, [`PATCHED_CODE`] when `None`
    pub code: Option<String>,
    /// Trailing free text
    pub additional_info: Option<String>,
}

impl PatchReport {
    /// A warning that `processor` patched `method`.
    pub fn new(processor: impl Into<String>, method: Token) -> Self {
        PatchReport {
            processor: processor.into(),
            caller: DEFAULT_CALLER.to_string(),
            method,
            position: None,
            allow_nearest: true,
            severity: Severity::Warning,
            code: None,
            additional_info: None,
        }
    }

    /// Names the reporting operation.
    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = caller.into();
        self
    }

    /// Points at the instruction at `offset`.
    #[must_use]
    pub fn at(mut self, offset: u32) -> Self {
        self.position = Some(offset);
        self
    }

    /// Only accept a location recorded for the exact instruction.
    #[must_use]
    pub fn exact_only(mut self) -> Self {
        self.allow_nearest = false;
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the diagnostic code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Appends free text after the message.
    #[must_use]
    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    /// Builds the diagnostic, resolving the location against `module`.
    #[must_use]
    pub fn to_diagnostic(&self, module: &CompiledModule) -> Diagnostic {
        let method_name = module
            .method_full_name(self.method)
            .unwrap_or_else(|| self.method.to_string());
        let location = SourceLocationResolver::new(module).resolve(
            self.method,
            self.position,
            self.allow_nearest,
        );
        let instruction = self.position.and_then(|offset| {
            module
                .resolve_method(self.method)
                .and_then(|method| method.body.as_ref())
                .and_then(|body| body.instruction_at(offset))
                .map(RawInstruction::from)
        });

        let message = format!(
            "'{}.{}' patched '{}'",
            self.processor, self.caller, method_name
        );
        let diagnostic = Diagnostic::new(self.severity, message)
            .with_origin(self.processor.as_str(), self.caller.as_str())
            .with_code(self.code.as_deref().unwrap_or(PATCHED_CODE))
            .with_location(location)
            .with_instruction(instruction);

        match &self.additional_info {
            Some(info) => diagnostic.with_additional_info(info.as_str()),
            None => diagnostic,
        }
    }
}

/// Writes diagnostics, one line each, to a text sink.
pub struct DiagnosticReporter<'a> {
    sink: &'a mut dyn Write,
    emitted: usize,
}

impl fmt::Debug for DiagnosticReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticReporter")
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl<'a> DiagnosticReporter<'a> {
    /// Create a reporter writing to `sink`.
    pub fn new(sink: &'a mut dyn Write) -> Self {
        DiagnosticReporter { sink, emitted: 0 }
    }

    /// Writes `diagnostic` as one line.
    pub fn report(&mut self, diagnostic: &Diagnostic) {
        match self.write_line(diagnostic) {
            Ok(()) => self.emitted += 1,
            Err(error) => log::warn!("Failed to write diagnostic '{diagnostic}': {error}"),
        }
    }

    /// Reports that a processor patched a method, anchored to source when possible.
    pub fn patched(&mut self, module: &CompiledModule, report: &PatchReport) {
        let diagnostic = report.to_diagnostic(module);
        self.report(&diagnostic);
    }

    /// Number of diagnostics written successfully.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn write_line(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        writeln!(self.sink, "{diagnostic}")?;
        self.sink.flush()
    }
}
