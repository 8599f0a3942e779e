//! Errors observed by callers of proxies and handles.

use contract::ErrorKind;
use contract::Failure;

use crate::transport::TransportError;

/// Why a handle cannot produce a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidHandle {
    /// The handle was never bound to an endpoint.
    Unbound,
    /// The endpoint the handle pointed at has been dropped.
    Dead,
    /// The remote object answers for a different interface.
    DescriptorMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid handle: {0:?}")]
    InvalidHandle(InvalidHandle),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Contract(#[from] contract::Error),
    /// A failure the operation declares, signaled by the remote implementation.
    #[error("remote failure: {0}")]
    Remote(#[from] Failure),
}

impl From<parcel::Error> for Error {
    fn from(e: parcel::Error) -> Self {
        Self::Contract(e.into())
    }
}

impl Error {
    /// Classifies the error, or `None` for a declared remote failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidHandle(_) => Some(ErrorKind::InvalidHandle),
            Self::Transport(e) => Some(e.kind()),
            Self::Contract(e) => Some(e.kind()),
            Self::Remote(_) => None,
        }
    }

    /// The declared failure, if the remote signaled one.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Remote(f) => Some(f),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
