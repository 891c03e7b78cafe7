//! Error taxonomy shared by every tracer stage.

use std::io;

/// Tracer result type
pub type TracerResult<T> = Result<T, TracerError>;

/// Tracer error type
///
/// Model-load errors are reportable: the caller prints them and stops
/// cleanly. Trace-structure errors are fatal: see [`TracerError::is_fatal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TracerError {
    /// A line of the model could not be parsed as a record of its section
    #[error("Invalid model format at line {line_number}: '{line}'")]
    InvalidModelFormat {
        /// One-based line number in the model stream
        line_number: usize,
        /// The offending line, verbatim
        line: String,
    },

    /// A section header the model loader does not know
    #[error("Unknown section '{name}' in model")]
    UnknownSection {
        /// The header text, verbatim
        name: String,
    },

    /// The trace does not have the structure the model implies
    #[error("Invalid trace format at line {line_number}: {reason}")]
    InvalidTraceFormat {
        /// One-based line number in the trace stream
        line_number: usize,
        /// What was expected or found
        reason: String,
    },

    /// The trace ended in the middle of a record
    #[error("Unexpected end of input while reading {expected}")]
    UnexpectedEndOfInput {
        /// What was being read
        expected: String,
    },

    /// Underlying stream failure
    #[error("IO error: {message}")]
    Io {
        /// Error message
        message: String,
    },
}

impl TracerError {
    /// Build an invalid model format error
    pub fn invalid_model(line_number: usize, line: impl Into<String>) -> Self {
        Self::InvalidModelFormat {
            line_number,
            line: line.into(),
        }
    }

    /// Build an invalid trace format error
    pub fn invalid_trace(line_number: usize, reason: impl Into<String>) -> Self {
        Self::InvalidTraceFormat {
            line_number,
            reason: reason.into(),
        }
    }

    /// Build an end of input error
    pub fn end_of_input(expected: impl Into<String>) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.into(),
        }
    }

    /// Whether the error comes from the trace structure.
    ///
    /// Fatal errors end the run; the rendered output up to that point is
    /// all that will be produced.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidTraceFormat { .. } | Self::UnexpectedEndOfInput { .. }
        )
    }

    /// Diagnostic hints for the most common causes of the error
    #[must_use]
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            Self::UnknownSection { .. } => &[
                "The encoding or line endings of the model may be wrong. Use LF instead of CRLF.",
            ],
            Self::InvalidTraceFormat { .. } | Self::UnexpectedEndOfInput { .. } => &[
                "The .if model may not match the .xtr trace.",
                "The files may use CRLF line endings. Use LF for both the .if and the .xtr file.",
            ],
            Self::InvalidModelFormat { .. } | Self::Io { .. } => &[],
        }
    }
}

impl From<io::Error> for TracerError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TracerError::invalid_model(3, "3:bogus:1");
        assert_eq!(
            format!("{}", err),
            "Invalid model format at line 3: '3:bogus:1'"
        );

        let err = TracerError::UnknownSection {
            name: "layout\r".to_string(),
        };
        assert!(format!("{}", err).contains("layout"));
    }

    #[test]
    fn test_fatal_tiers() {
        assert!(!TracerError::invalid_model(1, "x").is_fatal());
        assert!(
            !TracerError::UnknownSection {
                name: "foo".to_string()
            }
            .is_fatal()
        );
        assert!(TracerError::invalid_trace(7, "expected '.'").is_fatal());
        assert!(TracerError::end_of_input("state").is_fatal());
    }

    #[test]
    fn test_trace_hints_mention_line_endings() {
        let err = TracerError::invalid_trace(2, "expected '.'");
        assert!(err.hints().iter().any(|h| h.contains("CRLF")));
        assert!(TracerError::invalid_model(1, "x").hints().is_empty());
    }

    #[test]
    fn test_from_io_error() {
        let io = io::Error::new(io::ErrorKind::NotFound, "missing.xtr");
        let err: TracerError = io.into();
        assert!(matches!(err, TracerError::Io { ref message } if message.contains("missing.xtr")));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_equality() {
        let err1 = TracerError::end_of_input("transition");
        let err2 = TracerError::end_of_input("transition");
        assert_eq!(err1, err2);

        let err3 = TracerError::end_of_input("state");
        assert_ne!(err1, err3);
    }
}
