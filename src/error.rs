use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into two groups. Parsing errors ([`Error::Malformed`], [`Error::OutOfBounds`])
/// come out of the debug-symbol readers and are normally contained by the
/// [`crate::metadata::resolver::SourceLocationResolver`], which turns them into "no location".
/// Precondition errors ([`Error::MissingFoundationLibrary`], [`Error::TypeNotFound`],
/// [`Error::ConstructorNotFound`]) mean the module handed to a processor is not usable and
/// abort the processing run.
///
/// # Examples
///
/// ```rust
/// use dotpatch::Error;
///
/// let error = Error::ConstructorNotFound {
///     type_name: "System.Reflection.AssemblyFileVersionAttribute".to_string(),
///     parameter_count: 1,
/// };
/// assert!(error.is_fatal_precondition());
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The data is damaged and could not be parsed.
    ///
    /// Includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// None of the module's direct references is a loaded library defining the root object type.
    ///
    /// Every processor that needs runtime type metadata depends on this library, so the
    /// run cannot continue without it.
    #[error("Missing foundation library from module '{0}'")]
    MissingFoundationLibrary(String),

    /// A type could not be resolved by its full name.
    #[error("Failed to resolve type '{0}'")]
    TypeNotFound(String),

    /// The resolved type has no constructor with the requested number of parameters.
    #[error("No constructor with {parameter_count} parameter(s) on '{type_name}'")]
    ConstructorNotFound {
        /// Full name of the type that was searched
        type_name: String,
        /// The parameter count that was requested
        parameter_count: usize,
    },

    /// A token does not point to an existing row of the expected table.
    #[error("Invalid token - {0}")]
    InvalidToken(Token),

    /// A patch configuration was rejected before building a pipeline.
    #[error("Invalid configuration - {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Returns `true` for errors that indicate a malformed input module.
    ///
    /// These are the failures a processor surfaces to abort a run, as opposed to
    /// parse errors which are downgraded where they occur.
    #[must_use]
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingFoundationLibrary(_)
                | Error::TypeNotFound(_)
                | Error::ConstructorNotFound { .. }
                | Error::InvalidToken(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_macro_records_location() {
        let error = malformed_error!("bad value - {}", 42);
        match error {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "bad value - 42");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fatal_preconditions() {
        let missing = Error::MissingFoundationLibrary("Foo".into());
        let unresolved = Error::TypeNotFound("System.Object".into());
        let rejected = Error::InvalidConfiguration("empty".into());

        assert!(missing.is_fatal_precondition());
        assert!(unresolved.is_fatal_precondition());
        assert!(!out_of_bounds_error!().is_fatal_precondition());
        assert!(!rejected.is_fatal_precondition());
    }

    #[test]
    fn display() {
        let error = Error::MissingFoundationLibrary("Game".into());
        assert_eq!(
            error.to_string(),
            "Missing foundation library from module 'Game'"
        );
    }
}
