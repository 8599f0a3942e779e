//! # Transaction Frames
//!
//! Defines the layout of request and reply buffers.
//!
//! - **Request**: `[Interface token: string][Args...]`
//! - **Reply (ok)**: `[Status: int32 = 0][Return value]`
//! - **Reply (failure)**: `[Status: int32 = code][Message: string]`
//!
//! ## Invariants
//! - **Panic Safety**: All decoding paths return `Result`, never panicking on unknown data.
//! - **Strict Framing**: Decoders consume the whole buffer. Leftover bytes are
//!   a schema error, never silently ignored.

use crate::codec::decode_value;
use crate::codec::decode_values;
use crate::codec::encode_value;
use crate::codec::encode_values;
use crate::descriptor::Contract;
use crate::descriptor::OperationDescriptor;
use crate::error::Error;
use crate::error::Result;
use crate::failure::Failure;
use crate::failure::FailureKind;
use crate::value::Value;

use parcel::Decoder;
use parcel::Encoder;

/// Status word of a successful reply.
const STATUS_OK: i32 = 0;

/// Encodes an outbound request.
pub struct RequestEncoder<'a> {
    pub contract: &'a Contract,
    pub op: &'a OperationDescriptor,
    pub args: &'a [Value],
}

impl<'a> RequestEncoder<'a> {
    pub fn new(contract: &'a Contract, op: &'a OperationDescriptor, args: &'a [Value]) -> Self {
        Self { contract, op, args }
    }

    /// Encode this request into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.string(Some(self.contract.descriptor))?;
        encode_values(enc, self.op, self.args)
    }
}

/// Decodes an inbound request for a known operation.
#[derive(Debug)]
pub struct RequestDecoder {
    /// Arguments in declared parameter order.
    pub args: Vec<Value>,
}

impl RequestDecoder {
    /// Checks the interface token, then decodes exactly `op`'s parameters.
    pub fn decode(contract: &Contract, op: &OperationDescriptor, mut dec: Decoder) -> Result<Self> {
        let token = dec.string()?;
        if token != Some(contract.descriptor) {
            return Err(Error::InterfaceMismatch {
                expected: contract.descriptor,
                found: token.map(str::to_string),
            });
        }
        let args = decode_values(&mut dec, op)?;
        dec.finish()?;
        Ok(Self { args })
    }
}

/// Encodes a successful reply.
pub struct ReplyOkEncoder<'a> {
    pub op: &'a OperationDescriptor,
    pub value: &'a Value,
}

impl<'a> ReplyOkEncoder<'a> {
    pub fn new(op: &'a OperationDescriptor, value: &'a Value) -> Self {
        Self { op, value }
    }

    /// Encode this success reply into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.i32(STATUS_OK)?;
        encode_value(enc, self.value, &self.op.ret)
    }
}

/// Encodes a declared failure reply.
pub struct ReplyErrEncoder<'a> {
    pub failure: &'a Failure,
}

impl<'a> ReplyErrEncoder<'a> {
    pub fn new(failure: &'a Failure) -> Self {
        Self { failure }
    }

    /// Encode this failure reply into the encoder.
    pub fn encode(&self, enc: &mut Encoder) -> Result<()> {
        enc.i32(self.failure.kind.code())?;
        enc.string(self.failure.message.as_deref())?;
        Ok(())
    }
}

/// Decodes an inbound reply.
#[derive(Debug)]
pub struct ReplyDecoder {
    /// - `Ok(Value)`: the operation's return value.
    /// - `Err(Failure)`: a failure the operation declares.
    pub status: std::result::Result<Value, Failure>,
}

impl ReplyDecoder {
    /// Decode a reply to `op` from the decoder.
    ///
    /// # Errors
    /// `UnknownFailureCode` for a status word that is not a failure kind, and
    /// `UndeclaredFailure` for a kind `op` does not list.
    pub fn decode(op: &OperationDescriptor, mut dec: Decoder) -> Result<Self> {
        let status = match dec.i32()? {
            STATUS_OK => Ok(decode_value(&mut dec, &op.ret)?),
            code => {
                let kind = FailureKind::from_code(code).ok_or(Error::UnknownFailureCode(code))?;
                if !op.declares(kind) {
                    return Err(Error::UndeclaredFailure { operation: op.name, kind });
                }
                let message = dec.string()?.map(str::to_string);
                Err(Failure { kind, message })
            }
        };
        dec.finish()?;
        Ok(Self { status })
    }
}

/// Encodes the reply to an `INTERFACE_TRANSACTION`.
pub fn encode_interface_reply(enc: &mut Encoder, contract: &Contract) -> Result<()> {
    enc.i32(STATUS_OK)?;
    enc.string(Some(contract.descriptor))?;
    Ok(())
}

/// Decodes the reply to an `INTERFACE_TRANSACTION`, returning the descriptor.
pub fn decode_interface_reply(bytes: &[u8]) -> Result<Option<String>> {
    let mut dec = Decoder::new(bytes);
    match dec.i32()? {
        STATUS_OK => {}
        code => return Err(Error::UnknownFailureCode(code)),
    }
    let descriptor = dec.string()?.map(str::to_string);
    dec.finish()?;
    Ok(descriptor)
}
