//! Value types for triples: [`Triple`], its [`Object`] and [`Literal`].
//!
//! All three compare structurally. A [`SubjPred`] builder covers the common
//! case of attaching typed literals to a subject/predicate pair:
//!
//! ```
//! use triplestore::{Literal, SubjPred};
//!
//! let t = SubjPred::new("me", "age").integer_literal(32);
//! assert_eq!(t.object().literal(), Some(&Literal::integer(32)));
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::consts::{XSD_BOOLEAN, XSD_DATE_TIME, XSD_FLOAT, XSD_INTEGER, XSD_STRING};
use crate::errors::{Error, Result};

/// A typed scalar value: an open type tag plus its lexical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    datatype: String,
    value: String,
}

impl Literal {
    /// Builds a literal with an arbitrary type tag.
    pub fn new(datatype: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            datatype: datatype.into(),
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(XSD_STRING, value)
    }

    pub fn integer(value: i64) -> Self {
        Self::new(XSD_INTEGER, value.to_string())
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(XSD_BOOLEAN, value.to_string())
    }

    /// RFC 3339 form, UTC with a `Z` suffix; sub-second digits only when present.
    pub fn date_time(value: DateTime<Utc>) -> Self {
        Self::new(
            XSD_DATE_TIME,
            value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }

    pub fn float(value: f64) -> Self {
        Self::new(XSD_FLOAT, value.to_string())
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn invalid(&self, expected: &'static str) -> Error {
        Error::InvalidLiteral {
            datatype: self.datatype.clone(),
            value: self.value.clone(),
            expected,
        }
    }

    fn expect_type(&self, expected: &'static str) -> Result<&str> {
        if self.datatype != expected {
            return Err(self.invalid(expected));
        }
        Ok(&self.value)
    }

    pub fn as_integer(&self) -> Result<i64> {
        self.expect_type(XSD_INTEGER)?
            .trim()
            .parse()
            .map_err(|_| self.invalid(XSD_INTEGER))
    }

    /// Accepts the XSD lexical forms `true`, `false`, `1` and `0`.
    pub fn as_boolean(&self) -> Result<bool> {
        match self.expect_type(XSD_BOOLEAN)?.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.invalid(XSD_BOOLEAN)),
        }
    }

    pub fn as_date_time(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.expect_type(XSD_DATE_TIME)?.trim())
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| self.invalid(XSD_DATE_TIME))
    }

    pub fn as_float(&self) -> Result<f64> {
        self.expect_type(XSD_FLOAT)?
            .trim()
            .parse()
            .map_err(|_| self.invalid(XSD_FLOAT))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"^^{}", self.value, self.datatype)
    }
}

/// The value side of a triple: a literal or a reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Literal(Literal),
    Resource(String),
}

impl Object {
    pub fn resource(id: impl Into<String>) -> Self {
        Object::Resource(id.into())
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Object::Literal(l) => Some(l),
            Object::Resource(_) => None,
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Object::Resource(id) => Some(id),
            Object::Literal(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Object::Literal(_))
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Object::Literal(l)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Literal(l) => write!(f, "{}", l),
            Object::Resource(id) => write!(f, "<{}>", id),
        }
    }
}

/// A (subject, predicate, object) fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    subject: String,
    predicate: String,
    object: Object,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn object(&self) -> &Object {
        &self.object
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {}", self.subject, self.predicate, self.object)
    }
}

/// Half-built triple holding a subject and predicate.
#[derive(Debug, Clone)]
pub struct SubjPred {
    subject: String,
    predicate: String,
}

impl SubjPred {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
        }
    }

    pub fn object(self, object: Object) -> Triple {
        Triple {
            subject: self.subject,
            predicate: self.predicate,
            object,
        }
    }

    pub fn resource(self, id: impl Into<String>) -> Triple {
        self.object(Object::Resource(id.into()))
    }

    pub fn string_literal(self, value: impl Into<String>) -> Triple {
        self.object(Literal::string(value).into())
    }

    pub fn integer_literal(self, value: i64) -> Triple {
        self.object(Literal::integer(value).into())
    }

    pub fn boolean_literal(self, value: bool) -> Triple {
        self.object(Literal::boolean(value).into())
    }

    pub fn date_time_literal(self, value: DateTime<Utc>) -> Triple {
        self.object(Literal::date_time(value).into())
    }

    pub fn float_literal(self, value: f64) -> Triple {
        self.object(Literal::float(value).into())
    }
}

/// Something that can describe itself as triples about `subject`.
///
/// This is the seam for producers outside the store, such as mappers that
/// walk the fields of a record; the store only ever sees the triples.
pub trait ToTriples {
    fn to_triples(&self, subject: &str) -> Vec<Triple>;
}

/// True when `a` and `b` hold the same triples with the same multiplicities,
/// in any order.
pub fn unordered_eq(a: &[Triple], b: &[Triple]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&Triple, isize> = HashMap::new();
    for t in a {
        *counts.entry(t).or_default() += 1;
    }
    for t in b {
        match counts.get_mut(t) {
            Some(n) if *n > 0 => *n -= 1,
            _ => return false,
        }
    }
    true
}
