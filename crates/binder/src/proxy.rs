//! # Client Proxy
//!
//! Marshals values across a transaction boundary, driven by the contract.
//!
//! The proxy holds a contract and a handle and nothing else. There is no
//! retry, no caching and no default substitution: every invocation returns a
//! value of the declared return kind or exactly one error.
//!
//! ## Invariants
//!
//! - Only operations of the proxy's own contract can be invoked.
//! - Results match the descriptor or an error is returned.
//! - A reply failure the operation does not declare is a schema error.

use contract::Contract;
use contract::Error as ContractError;
use contract::OperationDescriptor;
use contract::ReplyDecoder;
use contract::RequestEncoder;
use contract::Value;

use parcel::Decoder;
use parcel::Encoder;

use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::error::InvalidHandle;
use crate::error::Result;
use crate::handle::RemoteHandle;
use crate::transport::TransportError;

#[derive(Debug, Clone)]
pub struct Proxy {
    contract: &'static Contract,
    handle: RemoteHandle,
}

impl Proxy {
    /// Builds a proxy over a live handle.
    ///
    /// # Errors
    /// `InvalidHandle` if the handle is unbound or its endpoint is gone.
    pub fn new(contract: &'static Contract, handle: RemoteHandle) -> Result<Self> {
        handle.transport().map_err(Error::InvalidHandle)?;
        Ok(Self { contract, handle })
    }

    /// Like `new`, but first asks the remote object for its descriptor.
    ///
    /// # Errors
    /// `InvalidHandle(DescriptorMismatch)` if the remote implements a
    /// different interface.
    pub async fn checked(contract: &'static Contract, handle: RemoteHandle) -> Result<Self> {
        let proxy = Self::new(contract, handle)?;
        let remote = proxy.handle.interface_descriptor().await?;
        if remote.as_deref() != Some(contract.descriptor) {
            warn!("expected {}, remote reports {:?}", contract.descriptor, remote);
            return Err(Error::InvalidHandle(InvalidHandle::DescriptorMismatch));
        }
        Ok(proxy)
    }

    pub fn contract(&self) -> &'static Contract {
        self.contract
    }

    pub fn handle(&self) -> &RemoteHandle {
        &self.handle
    }

    /// Execute one remote operation.
    ///
    /// Marshals `args` in declared order, transacts, and demarshals the reply
    /// according to `op.ret`.
    ///
    /// Returns `Transport` on delivery failure, `Contract` on a shape or
    /// payload error, and `Remote` if the implementation signaled a declared
    /// failure.
    #[tracing::instrument(skip(self, args), fields(interface = self.contract.descriptor, op = op.name))]
    pub async fn invoke(&self, op: &'static OperationDescriptor, args: &[Value]) -> Result<Value> {
        if self.contract.lookup(op.code).is_none_or(|own| own != op) {
            return Err(ContractError::UnknownOperation(op.code).into());
        }

        let mut enc = Encoder::new();
        RequestEncoder::new(self.contract, op, args).encode(&mut enc)?;
        let request = enc.into_bytes()?;

        let transport = self.handle.transport().map_err(|_| TransportError::DeadObject)?;
        let reply = match transport.transact(op.code, &request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("transaction failed: {e}");
                return Err(e.into());
            }
        };

        match ReplyDecoder::decode(op, Decoder::new(&reply))?.status {
            Ok(value) => Ok(value),
            Err(failure) => {
                debug!("remote failure: {failure}");
                Err(Error::Remote(failure))
            }
        }
    }
}
