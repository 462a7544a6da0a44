//! Error types for zmark

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Coarse error category, one per failure class the caller may branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Malformed structure in the input text
    Syntax,
    /// Well-formed input rejected by `FormatConfig` policy
    Configuration,
    /// Unsupported charset token in a declaration
    Encoding,
    /// Underlying stream failure on read, write, or close
    Resource,
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEnd,
    UnterminatedString,
    UnbalancedScope { open: char, close: char },
    Expected { expected: String, found: String },
    InvalidName { name: String },
    MissingEquals { attribute: String },
    MismatchedTag { open: String, close: String },
    MissingDeclaration,
    MissingVersion,
    InvalidVersion { version: String },
    DuplicateDeclarationAttribute { name: String },
    TrailingContent,
    AttributesDisallowed,
    DeclarationAfterContent,
    UnsupportedEncoding { charset: String },
    Io { message: String },
}

impl ErrorKind {
    /// Which of the four failure classes this kind belongs to.
    pub const fn category(&self) -> Category {
        match self {
            Self::AttributesDisallowed | Self::DeclarationAfterContent => Category::Configuration,
            Self::UnsupportedEncoding { .. } => Category::Encoding,
            Self::Io { .. } => Category::Resource,
            _ => Category::Syntax,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::UnterminatedString => write!(f, "unterminated quoted string"),
            Self::UnbalancedScope { open, close } => {
                write!(f, "unbalanced scope: no `{close}` matching `{open}`")
            }
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::InvalidName { name } => write!(f, "invalid name: `{name}`"),
            Self::MissingEquals { attribute } => {
                write!(f, "attribute `{attribute}` is missing `=`")
            }
            Self::MismatchedTag { open, close } => {
                write!(f, "closing tag `{close}` does not match open tag `{open}`")
            }
            Self::MissingDeclaration => write!(f, "document declaration is missing"),
            Self::MissingVersion => write!(f, "declaration has no version attribute"),
            Self::InvalidVersion { version } => {
                write!(f, "invalid declaration version: `{version}`")
            }
            Self::DuplicateDeclarationAttribute { name } => {
                write!(f, "duplicate declaration attribute: `{name}`")
            }
            Self::TrailingContent => write!(f, "trailing content after document root"),
            Self::AttributesDisallowed => {
                write!(f, "attributes are disallowed by configuration")
            }
            Self::DeclarationAfterContent => {
                write!(f, "declaration not permitted after content")
            }
            Self::UnsupportedEncoding { charset } => {
                write!(f, "unsupported encoding: `{charset}`")
            }
            Self::Io { message } => write!(f, "io failure: {message}"),
        }
    }
}

/// Main error type for zmark
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io {
                message: err.to_string(),
            },
            Span::empty(),
        )
    }
}

/// Result type alias for zmark
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::UnexpectedEnd, Pos::new(0, 1, 1));
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEnd);
        assert_eq!(err.category(), Category::Syntax);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(
            ErrorKind::MismatchedTag {
                open: "a".to_string(),
                close: "b".to_string(),
            },
            Pos::new(10, 2, 5),
        );
        let display = err.to_string();
        assert!(display.contains("error at"));
        assert!(display.contains("`b`"));
        assert!(display.contains("`a`"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ErrorKind::AttributesDisallowed.category(),
            Category::Configuration
        );
        assert_eq!(
            ErrorKind::UnsupportedEncoding {
                charset: "EBCDIC".to_string()
            }
            .category(),
            Category::Encoding
        );
        assert_eq!(
            ErrorKind::Io {
                message: "broken pipe".to_string()
            }
            .category(),
            Category::Resource
        );
        assert_eq!(ErrorKind::TrailingContent.category(), Category::Syntax);
    }
}
