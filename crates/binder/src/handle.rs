//! # Remote Handles
//!
//! A `RemoteHandle` is a weak reference to a transport endpoint. Whoever owns
//! the endpoint (a `ServiceManager`, a test) decides its lifetime; handles only
//! observe it.

use std::fmt;
use std::sync::Arc;
use std::sync::Weak;

use contract::INTERFACE_TRANSACTION;
use contract::PING_TRANSACTION;

use crate::error::Error;
use crate::error::InvalidHandle;
use crate::error::Result;
use crate::transport::Transport;

#[derive(Clone, Default)]
pub struct RemoteHandle {
    target: Option<Weak<dyn Transport>>,
}

impl RemoteHandle {
    /// Creates a handle observing `transport`.
    pub fn new(transport: &Arc<dyn Transport>) -> Self {
        Self { target: Some(Arc::downgrade(transport)) }
    }

    /// A handle that was never wired to an endpoint.
    pub fn unbound() -> Self {
        Self { target: None }
    }

    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    /// Returns true if the endpoint is still alive.
    pub fn is_alive(&self) -> bool {
        self.target.as_ref().is_some_and(|w| w.strong_count() > 0)
    }

    /// Upgrades to the live transport.
    pub fn transport(&self) -> std::result::Result<Arc<dyn Transport>, InvalidHandle> {
        let weak = self.target.as_ref().ok_or(InvalidHandle::Unbound)?;
        weak.upgrade().ok_or(InvalidHandle::Dead)
    }

    /// Sends a `PING_TRANSACTION`.
    pub async fn ping(&self) -> Result<()> {
        let transport = self.transport().map_err(Error::InvalidHandle)?;
        transport.transact(PING_TRANSACTION, &[]).await?;
        Ok(())
    }

    /// Asks the remote object which interface it implements.
    pub async fn interface_descriptor(&self) -> Result<Option<String>> {
        let transport = self.transport().map_err(Error::InvalidHandle)?;
        let reply = transport.transact(INTERFACE_TRANSACTION, &[]).await?;
        Ok(contract::decode_interface_reply(&reply)?)
    }
}

impl fmt::Debug for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.target {
            None => "unbound",
            Some(w) if w.strong_count() > 0 => "alive",
            Some(_) => "dead",
        };
        f.debug_struct("RemoteHandle").field("state", &state).finish()
    }
}
