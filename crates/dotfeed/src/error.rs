//! Error types for parsing dotenv documents and feeding records.
//!
//! This module contains the [`Error`] enum returned by every public entry
//! point, and the [`SyntaxError`] produced by the document parser. Both
//! integrate with [`miette`] so syntax errors render with the offending line
//! highlighted.
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::Syntax`] | The document is malformed or ends inside a quote |
//! | [`Error::InvalidTarget`] | The destination is not a writable record |
//! | [`Error::Field`] | A tagged field rejected the value it was fed |
//! | [`Error::Source`] | Reading the document failed |
//! | [`Error::InvalidUtf8`] | The document is not valid UTF-8 |
//!
//! # Fail-fast
//!
//! Parsing stops at the first syntax error and returns no partial result.
//! Feeding stops at the first field error, but fields assigned before it
//! keep their new values.
//!
//! # Secret Masking
//!
//! Fields tagged with `secret` have their values redacted in error messages
//! and Debug output:
//!
//! ```text
//! cannot set `api_port` field from API_PORT: expected u16, got <redacted>
//! ```

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::coerce::CoerceError;

/// The reason a single line was rejected by the parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LineFault {
    /// The line has an `=` but nothing before it (`=value`).
    MissingKey,

    /// The line has key content but never reaches an `=` (`KEY`).
    MissingSeparator,

    /// The key contains whitespace (`MY KEY=value`).
    InvalidKey,
}

impl Display for LineFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey => write!(f, "value without a key"),
            Self::MissingSeparator => write!(f, "key without `=`"),
            Self::InvalidKey => write!(f, "key contains whitespace"),
        }
    }
}

impl LineFault {
    fn help(self) -> &'static str {
        match self {
            Self::MissingKey => "put a key before the `=`, e.g. `KEY=value`",
            Self::MissingSeparator => "separate the key from its value with `=`",
            Self::InvalidKey => "keys may not contain spaces; use `_` instead",
        }
    }
}

/// A malformed dotenv document.
///
/// Carries the whole document as miette source code so the report can point
/// at the exact line (or the quote that was never closed).
///
/// # Example Output
///
/// ```text
/// dotfeed::syntax::invalid_line
///
///   × invalid syntax in line 3: value without a key
///    ╭─[.env:3:1]
///  2 │ APP_PORT=8585
///  3 │ =orphan
///    · ───┬───
///    ·    ╰── value without a key
///    ╰────
///   help: put a key before the `=`, e.g. `KEY=value`
/// ```
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum SyntaxError {
    /// A single line could not be parsed.
    #[error("invalid syntax in line {line}: {fault}")]
    #[diagnostic(code(dotfeed::syntax::invalid_line))]
    InvalidLine {
        /// 1-based line number.
        line: usize,

        /// What was wrong with the line.
        fault: LineFault,

        /// The document being parsed.
        #[source_code]
        src: NamedSource<String>,

        /// The rejected line.
        #[label("{fault}")]
        span: SourceSpan,

        /// Suggestion for how to fix the line.
        #[help]
        help: String,
    },

    /// The document ended while a quoted value was still open.
    #[error("unterminated quote: value opened with {quote} is never closed")]
    #[diagnostic(
        code(dotfeed::syntax::unterminated_quote),
        help("close the quoted value before the end of the document")
    )]
    UnterminatedQuote {
        /// The quote character that opened the value.
        quote: char,

        /// The document being parsed.
        #[source_code]
        src: NamedSource<String>,

        /// Where the quote was opened.
        #[label("quoted value opened here")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    pub(crate) fn invalid_line(
        line: usize,
        fault: LineFault,
        src: NamedSource<String>,
        span: SourceSpan,
    ) -> Self {
        Self::InvalidLine {
            line,
            fault,
            src,
            span,
            help: fault.help().to_string(),
        }
    }

    /// The 1-based line number, or `None` for document-level errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidLine { line, .. } => Some(*line),
            Self::UnterminatedQuote { .. } => None,
        }
    }
}

/// Errors that can occur while loading a dotenv document into a record.
///
/// # Example
///
/// ```rust,ignore
/// match dotfeed::decode_str(input, &mut config) {
///     Ok(report) => { /* success */ }
///     Err(Error::Syntax { source }) => {
///         eprintln!("bad .env at line {:?}", source.line());
///     }
///     Err(Error::Field { field, .. }) => {
///         eprintln!("could not set {field}");
///     }
///     Err(e) => {
///         // Pretty-print any error with miette
///         eprintln!("{:?}", miette::Report::from(e));
///     }
/// }
/// ```
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `dotfeed::syntax::invalid_line` | A line is malformed |
/// | `dotfeed::syntax::unterminated_quote` | The document ends inside a quote |
/// | `dotfeed::invalid_target` | The destination is not a record |
/// | `dotfeed::field_error` | A value could not be coerced into its field |
/// | `dotfeed::source_error` | The document could not be read |
/// | `dotfeed::invalid_utf8` | The document is not UTF-8 |
#[derive(Diagnostic)]
pub enum Error {
    /// The document could not be parsed.
    #[diagnostic(transparent)]
    Syntax {
        /// The underlying syntax error with source location.
        #[diagnostic_source]
        source: SyntaxError,
    },

    /// The destination passed to the mapper is not a writable record.
    #[diagnostic(code(dotfeed::invalid_target))]
    InvalidTarget {
        /// Type name of the rejected destination.
        target: String,

        /// Dynamic help message.
        #[help]
        help: String,
    },

    /// A tagged field could not accept the value it was fed.
    #[diagnostic(code(dotfeed::field_error))]
    Field {
        /// Dotted path of the field within the record (`database.port`).
        field: String,

        /// The key that fed the field.
        key: String,

        /// The raw value that failed to coerce.
        value: String,

        /// Whether the field is marked as secret.
        secret: bool,

        /// The expected type name (for diagnostic messages).
        expected_type: String,

        /// Dynamic help text generated from `expected_type`.
        #[help]
        help: String,

        /// The underlying coercion failure.
        source: CoerceError,
    },

    /// Reading the document failed.
    #[diagnostic(
        code(dotfeed::source_error),
        help("check that the dotenv source exists and is readable")
    )]
    Source {
        /// The I/O error, unchanged.
        source: std::io::Error,
    },

    /// The document is not valid UTF-8.
    #[diagnostic(
        code(dotfeed::invalid_utf8),
        help("save the dotenv file as UTF-8 text")
    )]
    InvalidUtf8 {
        /// Where decoding failed.
        source: std::str::Utf8Error,
    },
}

impl From<SyntaxError> for Error {
    fn from(source: SyntaxError) -> Self {
        Error::Syntax { source }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Source { source }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(source: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8 { source }
    }
}

// Manual Display impl for secret masking
impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { source } => write!(f, "{source}"),

            Error::InvalidTarget { target, .. } => {
                write!(f, "invalid target `{target}`: expected a writable record")
            }

            Error::Field {
                field,
                key,
                value,
                secret,
                expected_type,
                ..
            } => {
                if *secret {
                    write!(
                        f,
                        "cannot set `{field}` field from {key}: expected {expected_type}, got <redacted>"
                    )
                } else {
                    write!(
                        f,
                        "cannot set `{field}` field from {key}: expected {expected_type}, got {value:?}"
                    )
                }
            }

            Error::Source { source } => write!(f, "failed to read dotenv source: {source}"),

            Error::InvalidUtf8 { source } => {
                write!(f, "dotenv source is not valid UTF-8: {source}")
            }
        }
    }
}

// Manual Debug impl for secret masking
impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { source } => f.debug_struct("Syntax").field("source", source).finish(),

            Error::InvalidTarget { target, help } => f
                .debug_struct("InvalidTarget")
                .field("target", target)
                .field("help", help)
                .finish(),

            Error::Field {
                field,
                key,
                value,
                secret,
                expected_type,
                help,
                source,
            } => {
                let mut debug = f.debug_struct("Field");
                debug.field("field", field).field("key", key);

                if *secret {
                    debug.field("value", &"<redacted>");
                } else {
                    debug.field("value", value);
                }

                debug
                    .field("secret", secret)
                    .field("expected_type", expected_type)
                    .field("help", help)
                    .field("source", source)
                    .finish()
            }

            Error::Source { source } => f.debug_struct("Source").field("source", source).finish(),

            Error::InvalidUtf8 { source } => f
                .debug_struct("InvalidUtf8")
                .field("source", source)
                .finish(),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Syntax { source } => Some(source),
            Error::Field { source, .. } => Some(source),
            Error::Source { source } => Some(source),
            Error::InvalidUtf8 { source } => Some(source),
            Error::InvalidTarget { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructor helpers for ergonomic error creation
// ─────────────────────────────────────────────────────────────────────────────

impl Error {
    /// Creates an InvalidTarget error for the named destination type.
    pub fn invalid_target(target: impl Into<String>) -> Self {
        let target = target.into();
        let help = format!(
            "pass `&mut` to a struct deriving `Record`, not a `{target}`"
        );
        Error::InvalidTarget { target, help }
    }

    /// Creates a Field error with help text derived from the coercion failure.
    pub fn field(
        field: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        secret: bool,
        source: CoerceError,
    ) -> Self {
        let source = if secret { source.redacted() } else { source };
        let expected_type = source.expected().to_string();
        let help = format!("expected a valid {expected_type}");
        Error::Field {
            field: field.into(),
            key: key.into(),
            value: value.into(),
            secret,
            expected_type,
            help,
            source,
        }
    }

    /// Returns the syntax error if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(text: &str) -> NamedSource<String> {
        NamedSource::new("test.env", text.to_string())
    }

    #[test]
    fn test_invalid_line_display() {
        let err = SyntaxError::invalid_line(1, LineFault::MissingKey, src("=x"), (0, 2).into());
        assert_eq!(
            err.to_string(),
            "invalid syntax in line 1: value without a key"
        );
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_unterminated_quote_has_no_line() {
        let err = SyntaxError::UnterminatedQuote {
            quote: '"',
            src: src("A=\"x"),
            span: (2, 1).into(),
        };
        assert_eq!(err.line(), None);
        assert!(err.to_string().contains("unterminated quote"));
    }

    #[test]
    fn test_error_field_non_secret() {
        let err = Error::field(
            "app_port",
            "APP_PORT",
            "invalid",
            false,
            CoerceError::new("u16", "invalid digit found in string"),
        );
        let display = err.to_string();
        assert!(display.contains("app_port"));
        assert!(display.contains("APP_PORT"));
        assert!(display.contains("invalid"));
        assert!(display.contains("u16"));
    }

    #[test]
    fn test_error_field_secret_redacted() {
        let err = Error::field(
            "api_key",
            "API_KEY",
            "hunter2-secret",
            true,
            CoerceError::new("u64", "invalid digit found in string"),
        );
        let display = err.to_string();
        let debug = format!("{err:?}");
        assert!(display.contains("<redacted>"));
        assert!(!display.contains("hunter2-secret"));
        assert!(!debug.contains("hunter2-secret"));
    }

    #[test]
    fn test_error_field_secret_source_redacted() {
        let err = Error::field(
            "enabled",
            "FEATURE_FLAG",
            "hunter2",
            true,
            CoerceError::new("bool", "\"hunter2\" is not a boolean"),
        );
        let source = StdError::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("expected bool: <redacted>"));
    }

    #[test]
    fn test_error_invalid_target() {
        let err = Error::invalid_target("i32");
        assert!(err.to_string().contains("`i32`"));
        assert!(StdError::source(&err).is_none());
    }

    #[test]
    fn test_syntax_error_is_transparent_source() {
        let err: Error =
            SyntaxError::invalid_line(4, LineFault::MissingSeparator, src("A"), (0, 1).into())
                .into();
        assert_eq!(err.as_syntax().and_then(SyntaxError::line), Some(4));
        assert!(StdError::source(&err).is_some());
    }
}
