//! # Values
//!
//! Dynamic values exchanged through a contract, and the `Parcelable` bridge
//! between them and typed Rust data.

use crate::error::Error;
use crate::error::Result;

/// A value of some `Kind`, owned by the caller once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Void,
    Int32(i32),
    Int64(i64),
    String(Option<String>),
    /// Absent value in a `Nullable` slot.
    Null,
    /// Fields in declared order.
    Record(Vec<Value>),
    Sequence(Vec<Value>),
}

impl Value {
    /// Short description used in mismatch errors.
    pub fn desc(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::String(_) => "string",
            Value::Null => "null",
            Value::Record(_) => "record",
            Value::Sequence(_) => "sequence",
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::TypeMismatch { expected: expected.to_string(), found: self.desc() }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Some(s.to_string()))
    }
}

/// Conversion between a typed Rust value and its dynamic `Value`.
///
/// Implemented for the primitive kinds, `Option<T>` for nullable slots,
/// `Vec<T>` for sequences, and by hand for record types (see `RecordFields`).
pub trait Parcelable: Sized {
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Result<Self>;

    /// The value an absent `Option<Self>` takes. Strings are nullable on the
    /// wire themselves; every other kind needs a `Nullable` slot.
    fn null_value() -> Value {
        Value::Null
    }
}

impl Parcelable for () {
    fn into_value(self) -> Value {
        Value::Void
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Void => Ok(()),
            other => Err(other.mismatch("void")),
        }
    }
}

impl Parcelable for i32 {
    fn into_value(self) -> Value {
        Value::Int32(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int32(v) => Ok(v),
            other => Err(other.mismatch("int32")),
        }
    }
}

impl Parcelable for i64 {
    fn into_value(self) -> Value {
        Value::Int64(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int64(v) => Ok(v),
            other => Err(other.mismatch("int64")),
        }
    }
}

/// A non-null string. A null on the wire is rejected with `UnexpectedNull`;
/// use `Option<String>` where null is meaningful.
impl Parcelable for String {
    fn into_value(self) -> Value {
        Value::String(Some(self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(Some(s)) => Ok(s),
            Value::String(None) => Err(Error::UnexpectedNull("string")),
            other => Err(other.mismatch("string")),
        }
    }

    fn null_value() -> Value {
        Value::String(None)
    }
}

impl<T: Parcelable> Parcelable for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => T::null_value(),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        if value == T::null_value() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}

impl<T: Parcelable> Parcelable for Vec<T> {
    fn into_value(self) -> Value {
        Value::Sequence(self.into_iter().map(Parcelable::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch("sequence")),
        }
    }
}

/// Reads the fields of a decoded record in declared order.
///
/// ```
/// # use contract::{RecordFields, Value};
/// let value = Value::Record(vec![Value::Int32(7), "seven".into()]);
/// let mut fields = RecordFields::new(value, "Pair", 2)?;
/// let n: i32 = fields.next()?;
/// let s: String = fields.next()?;
/// assert_eq!((n, s.as_str()), (7, "seven"));
/// # Ok::<(), contract::Error>(())
/// ```
pub struct RecordFields {
    record: &'static str,
    fields: std::vec::IntoIter<Value>,
}

impl RecordFields {
    /// Unpacks `value` as a record of exactly `arity` fields.
    pub fn new(value: Value, record: &'static str, arity: usize) -> Result<Self> {
        let fields = match value {
            Value::Record(fields) => fields,
            other => return Err(other.mismatch(record)),
        };
        if fields.len() != arity {
            return Err(Error::ArityMismatch { context: record, expected: arity, found: fields.len() });
        }
        Ok(Self { record, fields: fields.into_iter() })
    }

    /// Takes the next field and converts it.
    pub fn next<T: Parcelable>(&mut self) -> Result<T> {
        let value = self.fields.next().ok_or(Error::ArityMismatch {
            context: self.record,
            expected: self.fields.len() + 1,
            found: 0,
        })?;
        T::from_value(value)
    }
}
