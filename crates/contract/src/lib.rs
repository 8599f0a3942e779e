//! # Contract
//!
//! A strict, descriptor-driven RPC vocabulary over Parcel.
//!
//! ## Architecture
//!
//! A `Contract` is a static list of `OperationDescriptor`s, each naming a stable
//! transaction code, the `Kind`s of its parameters and return value, and the
//! `FailureKind`s it may signal. Proxies and dispatchers are both driven from the
//! same descriptor, so the write sequence on one side is exactly the read
//! sequence on the other.
//!
//! - `kind` / `value`: the type vocabulary and its dynamic values.
//! - `codec`: type-directed translation between `Value` and parcel bytes.
//! - `frame`: request and reply envelopes (interface token, status marker).

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod failure;
pub mod frame;
pub mod kind;
pub mod value;

pub use codec::decode_value;
pub use codec::decode_values;
pub use codec::encode_value;
pub use codec::encode_values;
pub use descriptor::Contract;
pub use descriptor::OperationDescriptor;
pub use descriptor::Param;
pub use descriptor::TransactionCode;
pub use descriptor::FIRST_CALL_TRANSACTION;
pub use descriptor::INTERFACE_TRANSACTION;
pub use descriptor::LAST_CALL_TRANSACTION;
pub use descriptor::PING_TRANSACTION;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use failure::Failure;
pub use failure::FailureKind;
pub use frame::ReplyDecoder;
pub use frame::ReplyErrEncoder;
pub use frame::ReplyOkEncoder;
pub use frame::RequestDecoder;
pub use frame::RequestEncoder;
pub use frame::decode_interface_reply;
pub use frame::encode_interface_reply;
pub use kind::Field;
pub use kind::Kind;
pub use kind::RecordSchema;
pub use value::Parcelable;
pub use value::RecordFields;
pub use value::Value;

#[cfg(test)]
mod tests;
