//! Transport error types

use thiserror::Error;

/// Transport failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// HTTP status for `Status` failures
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connection, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Status,
            message: message.into(),
            status: Some(code),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }
}

/// Failure classification.
///
/// The controller treats every kind the same way (degrade to a visible
/// fallback); the kind only feeds logging and the session list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Request did not complete within the configured timeout
    Timeout,
    /// Connection refused, reset, DNS failure
    Connection,
    /// Server answered with a non-success status
    Status,
    /// Body missing, not JSON, or missing an expected field
    Decode,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Status => "status",
            Self::Decode => "decode",
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(format!("Malformed response body: {e}"))
    }
}
