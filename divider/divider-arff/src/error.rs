//! Error types for ARFF decoding and encoding.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ARFF operations.
pub type ArffResult<T> = Result<T, ArffError>;

/// Malformed or unsupported ARFF input.
///
/// Decoding never returns a partial table alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No `@RELATION` declaration was found.
    #[error("missing @RELATION declaration")]
    MissingRelation,

    /// No `@DATA` section was found.
    #[error("missing @DATA section")]
    MissingData,

    /// The header declares zero attributes.
    #[error("no @ATTRIBUTE declarations")]
    NoAttributes,

    /// The `@DATA` section holds no records.
    #[error("@DATA section is empty")]
    EmptyData,

    /// A header or data line could not be parsed.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// A data record does not match the declared attributes.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The header declares an attribute type this codec does not read.
    #[error("line {line}: unsupported attribute type: {kind}")]
    UnsupportedAttribute {
        /// 1-based line number.
        line: usize,
        /// The declared type keyword.
        kind: String,
    },
}

impl FormatError {
    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Creates a malformed record error.
    #[must_use]
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during ARFF operations.
#[derive(Debug, Error)]
pub enum ArffError {
    /// Input text is not valid ARFF.
    #[error("invalid ARFF: {0}")]
    Format(#[from] FormatError),

    /// A value cannot be rendered into ARFF's grammar.
    #[error("cannot encode column '{column}': {message}")]
    Encoding {
        /// Column holding the value.
        column: String,
        /// Zero-based row, when the problem is a single value.
        row: Option<usize>,
        /// What was wrong.
        message: String,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The path does not carry an `.arff` extension.
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArffError {
    /// Creates an encoding error for a whole column.
    #[must_use]
    pub fn encoding(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            column: column.into(),
            row: None,
            message: message.into(),
        }
    }

    /// Creates an encoding error for a single value.
    #[must_use]
    pub fn encoding_at(column: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::Encoding {
            column: column.into(),
            row: Some(row),
            message: message.into(),
        }
    }

    /// Returns true if this is a [`FormatError`].
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Returns the inner [`FormatError`], if any.
    #[must_use]
    pub const fn as_format(&self) -> Option<&FormatError> {
        match self {
            Self::Format(err) => Some(err),
            _ => None,
        }
    }
}
