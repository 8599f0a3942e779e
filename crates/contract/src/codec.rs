//! # Codec
//!
//! The translation layer between `Value` and the parcel wire format, driven by
//! the declared `Kind`.
//!
//! ## Invariants
//! - **Recursion Safety**: All recursive operations are bounded by `MAX_RECURSION_DEPTH`.
//! - **Type Strictness**: Every value is checked against its declared kind
//!   before it is written, and every read checks the wire tag.
//! - **Caps First**: An oversized sequence is refused before any of its items
//!   are written or read.

use crate::descriptor::OperationDescriptor;
use crate::error::Error;
use crate::error::Result;
use crate::kind::Kind;
use crate::value::Value;

use parcel::Decoder;
use parcel::Encoder;

/// The maximum nesting depth for kinds before giving up.
const MAX_RECURSION_DEPTH: usize = 32;

/// Encodes `value` as `kind` into the encoder stream.
///
/// # Errors
/// `TypeMismatch` or `ArityMismatch` if the value does not have the declared
/// shape, and `SequenceTooLarge` if a sequence exceeds its cap.
pub fn encode_value(enc: &mut Encoder, value: &Value, kind: &Kind) -> Result<()> {
    encode_value_impl(enc, value, kind, 0)
}

fn encode_value_impl(enc: &mut Encoder, value: &Value, kind: &Kind, depth: usize) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded);
    }

    match (kind, value) {
        (Kind::Void, Value::Void) => {}
        (Kind::Int32, Value::Int32(v)) => enc.i32(*v)?,
        (Kind::Int64, Value::Int64(v)) => enc.i64(*v)?,
        (Kind::String, Value::String(s)) => enc.string(s.as_deref())?,
        (Kind::Nullable(_), Value::Null) => enc.null()?,
        (Kind::Nullable(inner), other) => encode_value_impl(enc, other, inner, depth + 1)?,
        (Kind::Record(schema), Value::Record(fields)) => {
            if fields.len() != schema.fields.len() {
                return Err(Error::ArityMismatch {
                    context: schema.name,
                    expected: schema.fields.len(),
                    found: fields.len(),
                });
            }
            enc.record_begin()?;
            for (field, value) in schema.fields.iter().zip(fields) {
                encode_value_impl(enc, value, &field.kind, depth + 1)?;
            }
            enc.record_end()?;
        }
        (Kind::Sequence { item, max }, Value::Sequence(items)) => {
            if items.len() > *max {
                return Err(parcel::Error::SequenceTooLarge { count: items.len(), max: *max }.into());
            }
            enc.sequence_begin(*max)?;
            for value in items {
                encode_value_impl(enc, value, item, depth + 1)?;
            }
            enc.sequence_end()?;
        }
        (kind, value) => {
            return Err(Error::TypeMismatch { expected: kind.to_string(), found: value.desc() });
        }
    }
    Ok(())
}

/// Decodes a single value of the declared kind.
pub fn decode_value(dec: &mut Decoder, kind: &Kind) -> Result<Value> {
    decode_value_impl(dec, kind, 0)
}

fn decode_value_impl(dec: &mut Decoder, kind: &Kind, depth: usize) -> Result<Value> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded);
    }

    match kind {
        Kind::Void => Ok(Value::Void),
        Kind::Int32 => Ok(Value::Int32(dec.i32()?)),
        Kind::Int64 => Ok(Value::Int64(dec.i64()?)),
        Kind::String => Ok(Value::String(dec.string()?.map(str::to_string))),
        Kind::Nullable(inner) => {
            if dec.peek_null()? {
                dec.null()?;
                Ok(Value::Null)
            } else {
                decode_value_impl(dec, inner, depth + 1)
            }
        }
        Kind::Record(schema) => {
            let mut body = dec.record()?;
            let mut fields = Vec::with_capacity(schema.fields.len());
            for field in schema.fields {
                fields.push(decode_value_impl(&mut body, &field.kind, depth + 1)?);
            }
            body.finish()?;
            Ok(Value::Record(fields))
        }
        Kind::Sequence { item, max } => {
            let count = dec.sequence(*max)?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_value_impl(dec, item, depth + 1)?);
            }
            Ok(Value::Sequence(items))
        }
    }
}

/// Encodes an operation's arguments in declared parameter order.
///
/// # Errors
/// `ArityMismatch` if `args` does not have one value per parameter.
pub fn encode_values(enc: &mut Encoder, op: &OperationDescriptor, args: &[Value]) -> Result<()> {
    if args.len() != op.params.len() {
        return Err(Error::ArityMismatch { context: op.name, expected: op.params.len(), found: args.len() });
    }
    for (param, value) in op.params.iter().zip(args) {
        encode_value(enc, value, &param.kind)?;
    }
    Ok(())
}

/// Decodes an operation's arguments in declared parameter order.
pub fn decode_values(dec: &mut Decoder, op: &OperationDescriptor) -> Result<Vec<Value>> {
    op.params.iter().map(|param| decode_value(dec, &param.kind)).collect()
}
