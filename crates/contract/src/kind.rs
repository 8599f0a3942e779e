//! # Kinds
//!
//! The static type vocabulary of a contract. Kinds are `const`-constructible so
//! that whole contracts can live in `static` items and never change at runtime.

use std::fmt;

/// The declared shape of a parameter, return value or record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// No payload. Only meaningful as a return kind.
    Void,
    Int32,
    Int64,
    /// Nullable UTF-8 string.
    String,
    /// Fixed, ordered list of fields.
    Record(&'static RecordSchema),
    /// Either a `Null` marker or a value of the inner kind.
    Nullable(&'static Kind),
    /// Count-prefixed list holding at most `max` items.
    Sequence { item: &'static Kind, max: usize },
}

/// The field layout of a record kind.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

#[derive(Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
}

impl RecordSchema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }
}

impl Field {
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self { name, kind }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Void => write!(f, "void"),
            Kind::Int32 => write!(f, "int32"),
            Kind::Int64 => write!(f, "int64"),
            Kind::String => write!(f, "string"),
            Kind::Record(schema) => write!(f, "{}", schema.name),
            Kind::Nullable(inner) => write!(f, "{inner}?"),
            Kind::Sequence { item, max } => write!(f, "sequence<{item}; {max}>"),
        }
    }
}
