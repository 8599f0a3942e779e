//! # Error Definitions
//!
//! Failures of the contract layer, and the taxonomy every layer above reports in.

use crate::descriptor::TransactionCode;
use crate::failure::FailureKind;

/// The error kinds a caller of a proxy or dispatcher can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The handle cannot be used to build a proxy (unbound, dead, wrong interface).
    InvalidHandle,
    /// The transaction failed below the application layer.
    TransportUnavailable,
    /// The dispatcher received a transaction code its contract does not declare.
    UnknownOperation,
    /// Buffer contents do not match the descriptor's declared shape.
    SchemaMismatch,
    /// Corrupt length, flag or tag while decoding.
    MalformedPayload,
    /// A sequence exceeded its declared cap.
    PayloadTooLarge,
}

impl From<parcel::ErrorKind> for ErrorKind {
    fn from(kind: parcel::ErrorKind) -> Self {
        match kind {
            parcel::ErrorKind::MalformedPayload => Self::MalformedPayload,
            parcel::ErrorKind::SchemaMismatch => Self::SchemaMismatch,
            parcel::ErrorKind::PayloadTooLarge => Self::PayloadTooLarge,
        }
    }
}

/// Operational failures within the contract layer itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The underlying parcel read or write failed.
    #[error(transparent)]
    Parcel(#[from] parcel::Error),
    /// A value did not match the kind the descriptor declares.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },
    /// Wrong number of arguments or record fields.
    #[error("arity mismatch in {context}: expected {expected}, found {found}")]
    ArityMismatch { context: &'static str, expected: usize, found: usize },
    /// A null arrived where the typed layer requires a value.
    #[error("unexpected null for {0}")]
    UnexpectedNull(&'static str),
    /// The request was written for a different interface.
    #[error("interface token mismatch: expected {expected}, found {found:?}")]
    InterfaceMismatch { expected: &'static str, found: Option<String> },
    /// The reply carried a status code outside the known failure kinds.
    #[error("unknown failure code {0}")]
    UnknownFailureCode(i32),
    /// The reply carried a failure kind the operation does not declare.
    #[error("operation {operation} does not declare failure {kind:?}")]
    UndeclaredFailure { operation: &'static str, kind: FailureKind },
    /// No descriptor exists for the transaction code.
    #[error("unknown transaction code {0:#x}")]
    UnknownOperation(TransactionCode),
    /// Two descriptors in one contract share a transaction code.
    #[error("transaction code {code:#x} used by both {first} and {second}")]
    DuplicateCode { code: TransactionCode, first: &'static str, second: &'static str },
    /// A descriptor uses a code outside the user call range.
    #[error("operation {operation} uses reserved transaction code {code:#x}")]
    ReservedCode { operation: &'static str, code: TransactionCode },
    /// A kind nests deeper than the codec is willing to follow.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parcel(e) => e.kind().into(),
            Error::UnknownFailureCode(_) => ErrorKind::MalformedPayload,
            Error::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Error::TypeMismatch { .. }
            | Error::ArityMismatch { .. }
            | Error::UnexpectedNull(_)
            | Error::InterfaceMismatch { .. }
            | Error::UndeclaredFailure { .. }
            | Error::DuplicateCode { .. }
            | Error::ReservedCode { .. }
            | Error::RecursionLimitExceeded => ErrorKind::SchemaMismatch,
        }
    }
}

/// A specialized Result type for contract operations.
pub type Result<T> = std::result::Result<T, Error>;
