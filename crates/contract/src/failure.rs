//! Declared remote failures, carried in the reply's status marker.

/// Exception codes a remote operation may signal instead of a value.
///
/// The numeric values match the binder status exception codes, so a reply's
/// leading status word is either `0` (success) or one of these.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Security = -1,
    BadParcelable = -2,
    IllegalArgument = -3,
    NullPointer = -4,
    IllegalState = -5,
    NetworkMainThread = -6,
    UnsupportedOperation = -7,
    ServiceSpecific = -8,
}

impl FailureKind {
    /// Returns the failure kind for a status word, or `None` if unknown.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Security),
            -2 => Some(Self::BadParcelable),
            -3 => Some(Self::IllegalArgument),
            -4 => Some(Self::NullPointer),
            -5 => Some(Self::IllegalState),
            -6 => Some(Self::NetworkMainThread),
            -7 => Some(Self::UnsupportedOperation),
            -8 => Some(Self::ServiceSpecific),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A failure signaled by the remote implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}{}", message_suffix(.message))]
pub struct Failure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: Some(message.into()) }
    }

    pub fn bare(kind: FailureKind) -> Self {
        Self { kind, message: None }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}
