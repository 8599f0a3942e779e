//! # Transport Abstraction
//!
//! A minimal, async interface for moving transaction buffers to a remote object.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: The Transport knows nothing about contracts or values.
//!   It moves a transaction code and an opaque request buffer.
//! - **Request-Response**: Every transaction is "send bytes, await bytes".
//! - **Distinguishable Failures**: A `TransportError` is never confused with an
//!   application failure, which travels inside a successful reply.

use contract::ErrorKind;
use contract::TransactionCode;

/// Errors that occur below the application layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The remote object is gone or its endpoint stopped serving.
    #[error("remote object is dead")]
    DeadObject,
    /// No reply arrived before the configured deadline.
    #[error("transaction timed out")]
    Timeout,
    /// The request buffer exceeds what the transport will carry.
    #[error("transaction of {size} bytes exceeds the {limit} byte limit")]
    TransactionTooLarge { size: usize, limit: usize },
    /// The remote dispatcher refused the transaction before running it.
    #[error("transaction rejected ({kind:?}): {detail}")]
    Rejected { kind: ErrorKind, detail: String },
}

impl TransportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DeadObject | Self::Timeout | Self::TransactionTooLarge { .. } => {
                ErrorKind::TransportUnavailable
            }
            Self::Rejected { kind, .. } => *kind,
        }
    }
}

impl From<contract::Error> for TransportError {
    fn from(e: contract::Error) -> Self {
        Self::Rejected { kind: e.kind(), detail: e.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// A mechanism to deliver a transaction and receive its reply.
///
/// This trait is designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a request for `code` and waits for the reply bytes.
    ///
    /// # Invariants
    /// - Must return `Ok(vec)` with the raw reply on success, including
    ///   replies that carry an application failure.
    /// - Must not interpret the payload content.
    async fn transact(&self, code: TransactionCode, request: &[u8]) -> Result<Vec<u8>>;
}
