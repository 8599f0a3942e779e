//! # Binder
//!
//! Handles, transports, client proxies and server dispatchers for
//! contract-driven transactions.
//!
//! ## Architecture
//!
//! - `transport`: the byte-level `transact(code, request)` seam.
//! - `handle`: weak `RemoteHandle`s to transport endpoints.
//! - `proxy`: client-side marshalling over a handle.
//! - `dispatch`: server-side demarshalling into a `Handler`.
//! - `local` / `channel`: in-process and task-to-task transports.
//! - `registry`: a name-to-endpoint `ServiceManager`.

pub mod channel;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod local;
pub mod proxy;
pub mod registry;
pub mod transport;

pub use dispatch::Dispatcher;
pub use dispatch::Handler;
pub use error::Error;
pub use error::InvalidHandle;
pub use error::Result;
pub use handle::RemoteHandle;
pub use local::LocalBinder;
pub use proxy::Proxy;
pub use registry::ServiceManager;
pub use transport::Transport;
pub use transport::TransportError;
