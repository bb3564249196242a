//! Error type shared by the store, the codecs and the configuration loader.

use std::fmt;
use std::io;

use crate::model::Triple;

/// A field of a binary triple frame, used to say where a decode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Subject,
    Predicate,
    ObjectKind,
    Resource,
    LiteralType,
    LiteralValue,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Subject => "subject",
            Field::Predicate => "predicate",
            Field::ObjectKind => "object type",
            Field::Resource => "resource",
            Field::LiteralType => "literal type",
            Field::LiteralValue => "literal value",
        };
        f.write_str(name)
    }
}

/// Line and column (both 1-based, column counted in chars) of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The token class an N-Triples statement was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Subject,
    Predicate,
    Object,
    FullStop,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Expected::Subject => "subject IRI",
            Expected::Predicate => "predicate IRI",
            Expected::Object => "object IRI or literal",
            Expected::FullStop => "'.'",
        };
        f.write_str(what)
    }
}

/// Errors that can arise while building, encoding or decoding triples.
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O error, passed through unchanged.
    Io(io::Error),
    /// A binary frame ended inside `field`.
    Truncated { field: Field, source: io::Error },
    /// A field is too long for its binary length prefix.
    FieldTooLong { field: Field, len: usize },
    /// A binary frame carried an object kind other than resource or literal.
    UnknownObjectKind(u8),
    /// A binary field was not valid UTF-8.
    InvalidUtf8 { field: Field },
    /// An N-Triples statement did not have the expected shape.
    Syntax {
        expected: Expected,
        found: String,
        position: Position,
    },
    /// A literal could not be read as the `expected` type.
    InvalidLiteral {
        datatype: String,
        value: String,
        expected: &'static str,
    },
    /// A dataset decoder worker died before reporting.
    Worker(String),
    /// A dataset configuration could not be read or is inconsistent.
    Config(String),
    /// A triple has no faithful counterpart in another RDF library.
    Interop(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Truncated { field, source } => write!(f, "{}: {}", field, source),
            Error::FieldTooLong { field, len } => {
                write!(f, "{}: {} bytes do not fit a u32 length", field, len)
            }
            Error::UnknownObjectKind(k) => write!(f, "object type: unknown kind {}", k),
            Error::InvalidUtf8 { field } => write!(f, "{}: invalid utf-8", field),
            Error::Syntax {
                expected,
                found,
                position,
            } => write!(f, "{}: expected {}, found {}", position, expected, found),
            Error::InvalidLiteral {
                datatype,
                value,
                expected,
            } => write!(f, "cannot read {} literal {:?} as {}", datatype, value, expected),
            Error::Worker(m) => write!(f, "{}", m),
            Error::Config(m) => write!(f, "{}", m),
            Error::Interop(m) => write!(f, "{}", m),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Truncated { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A decode that stopped on `error` after producing `triples`.
///
/// Decoders keep whatever they read before the failure; callers that only
/// care about the error can use `?`, which converts into [`Error`].
#[derive(Debug)]
pub struct PartialDecode {
    pub triples: Vec<Triple>,
    pub error: Error,
}

impl fmt::Display for PartialDecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (after {} triples decoded)",
            self.error,
            self.triples.len()
        )
    }
}

impl std::error::Error for PartialDecode {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<PartialDecode> for Error {
    fn from(p: PartialDecode) -> Self {
        p.error
    }
}
