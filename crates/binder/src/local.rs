//! In-process transport bound directly to a dispatcher.

use std::sync::Arc;

use contract::TransactionCode;
use parcel::MAX_IPC_SIZE;
use tokio::sync::Mutex;

use crate::dispatch::Dispatcher;
use crate::transport;
use crate::transport::Transport;
use crate::transport::TransportError;

/// A handle target that runs transactions on the caller's task.
///
/// Transactions through one `LocalBinder` are serialized: each completes
/// before the next one starts.
pub struct LocalBinder {
    dispatcher: Dispatcher,
    order: Mutex<()>,
}

impl LocalBinder {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher, order: Mutex::new(()) }
    }

    /// Wraps the binder for use with `RemoteHandle::new`.
    pub fn into_transport(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl Transport for LocalBinder {
    async fn transact(&self, code: TransactionCode, request: &[u8]) -> transport::Result<Vec<u8>> {
        if request.len() > MAX_IPC_SIZE {
            return Err(TransportError::TransactionTooLarge { size: request.len(), limit: MAX_IPC_SIZE });
        }
        let _turn = self.order.lock().await;
        Ok(self.dispatcher.dispatch(code, request).await?)
    }
}
