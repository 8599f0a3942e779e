//! # Channel Transport
//!
//! A client transport and a server endpoint connected by tokio channels. The
//! endpoint's `serve` loop runs transactions one at a time, in arrival order.

use std::time::Duration;

use contract::TransactionCode;
use parcel::MAX_IPC_SIZE;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::transport;
use crate::transport::Transport;
use crate::transport::TransportError;

/// Client-side settings for a channel pair.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Deadline for a reply. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Transactions that may queue before `transact` waits for room.
    pub capacity: usize,
    /// Largest request the client will send.
    pub max_request: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { timeout: None, capacity: 32, max_request: MAX_IPC_SIZE }
    }
}

impl ChannelConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

struct Transaction {
    code: TransactionCode,
    request: Vec<u8>,
    reply: oneshot::Sender<transport::Result<Vec<u8>>>,
}

/// The client half of a channel pair.
pub struct ChannelTransport {
    tx: mpsc::Sender<Transaction>,
    config: ChannelConfig,
}

/// The server half of a channel pair.
pub struct Endpoint {
    rx: mpsc::Receiver<Transaction>,
}

/// Creates a connected client transport and server endpoint.
pub fn pair(config: ChannelConfig) -> (ChannelTransport, Endpoint) {
    let (tx, rx) = mpsc::channel(config.capacity.max(1));
    (ChannelTransport { tx, config }, Endpoint { rx })
}

impl Endpoint {
    /// Serves transactions until every client transport is dropped.
    pub async fn serve(mut self, dispatcher: Dispatcher) {
        while let Some(txn) = self.rx.recv().await {
            let reply = dispatcher
                .dispatch(txn.code, &txn.request)
                .await
                .map_err(TransportError::from);
            // the caller may have timed out and gone away
            let _ = txn.reply.send(reply);
        }
        debug!("{} endpoint closed", dispatcher.contract().descriptor);
    }
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
    async fn transact(&self, code: TransactionCode, request: &[u8]) -> transport::Result<Vec<u8>> {
        if request.len() > self.config.max_request {
            return Err(TransportError::TransactionTooLarge {
                size: request.len(),
                limit: self.config.max_request,
            });
        }

        let (reply, rx) = oneshot::channel();
        let txn = Transaction { code, request: request.to_vec(), reply };
        self.tx.send(txn).await.map_err(|_| TransportError::DeadObject)?;

        let outcome = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, rx).await.map_err(|_| TransportError::Timeout)?,
            None => rx.await,
        };
        // endpoint dropped the transaction without replying
        outcome.map_err(|_| TransportError::DeadObject)?
    }
}
