//! # Server Dispatcher
//!
//! Turns an incoming `(code, request)` into a reply by consulting the contract,
//! decoding the arguments, and running the local implementation.
//!
//! ## Invariants
//!
//! - A code the contract does not declare never reaches the `Handler`.
//! - A request that does not decode exactly (wrong token, wrong shape,
//!   trailing bytes) never reaches the `Handler`.
//! - The dispatcher holds no lock of its own. Concurrent callers are the
//!   handler's problem; per-handle ordering is the transport's.

use std::sync::Arc;

use contract::Contract;
use contract::Error;
use contract::Failure;
use contract::OperationDescriptor;
use contract::ReplyErrEncoder;
use contract::ReplyOkEncoder;
use contract::RequestDecoder;
use contract::TransactionCode;
use contract::Value;
use contract::INTERFACE_TRANSACTION;
use contract::PING_TRANSACTION;

use parcel::Decoder;
use parcel::Encoder;

use tracing::debug;
use tracing::error;
use tracing::warn;

/// The local implementation behind a dispatcher.
///
/// Receives arguments already checked against `op.params` and returns either
/// a value of kind `op.ret` or one of `op.failures`.
#[async_trait::async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(
        &self,
        op: &'static OperationDescriptor,
        args: Vec<Value>,
    ) -> std::result::Result<Value, Failure>;
}

#[derive(Clone)]
pub struct Dispatcher {
    contract: &'static Contract,
    handler: Arc<dyn Handler>,
}

impl Dispatcher {
    pub fn new(contract: &'static Contract, handler: Arc<dyn Handler>) -> Self {
        Self { contract, handler }
    }

    pub fn contract(&self) -> &'static Contract {
        self.contract
    }

    /// Handles one transaction and returns the reply bytes.
    ///
    /// # Errors
    /// `UnknownOperation` for an undeclared code, and a schema or payload error
    /// for a request that does not match the descriptor. Failures the
    /// handler signals are not errors here; they are encoded into the reply.
    #[tracing::instrument(skip(self, request), fields(interface = self.contract.descriptor, len = request.len()))]
    pub async fn dispatch(&self, code: TransactionCode, request: &[u8]) -> contract::Result<Vec<u8>> {
        match code {
            PING_TRANSACTION => return Ok(Vec::new()),
            INTERFACE_TRANSACTION => {
                let mut enc = Encoder::new();
                contract::encode_interface_reply(&mut enc, self.contract)?;
                return Ok(enc.into_bytes()?);
            }
            _ => {}
        }

        let Some(op) = self.contract.lookup(code) else {
            warn!("unknown transaction code {code:#x}");
            return Err(Error::UnknownOperation(code));
        };

        let args = match RequestDecoder::decode(self.contract, op, Decoder::new(request)) {
            Ok(req) => req.args,
            Err(e) => {
                warn!("rejecting {}: {}", op.name, e);
                return Err(e);
            }
        };

        debug!("{}({:?})", op.name, args);
        let mut enc = Encoder::new();
        match self.handler.handle(op, args).await {
            Ok(value) => {
                if let Err(e) = ReplyOkEncoder::new(op, &value).encode(&mut enc) {
                    error!("{} returned a value that does not match its descriptor: {}", op.name, e);
                    return Err(e);
                }
            }
            Err(failure) => {
                if !op.declares(failure.kind) {
                    error!("{} signaled undeclared failure {:?}", op.name, failure.kind);
                    return Err(Error::UndeclaredFailure { operation: op.name, kind: failure.kind });
                }
                debug!("{} failed: {}", op.name, failure);
                ReplyErrEncoder::new(&failure).encode(&mut enc)?;
            }
        }
        Ok(enc.into_bytes()?)
    }
}
