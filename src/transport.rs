//! Transport abstraction
//!
//! Every backend call made by the controller and the session list goes
//! through [`Transport`], so the runtime can be driven by mocks in tests.

mod error;
mod http;

pub use error::{TransportError, TransportErrorKind};
pub use http::HttpTransport;

use crate::session::SessionRef;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Backend endpoints consumed by this crate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /meta/{session}`
    Meta(SessionRef),
    /// `GET /memory/{session}`
    Memory(SessionRef),
    /// `POST /chat`
    Chat,
    /// `GET /sessions`
    ListSessions,
    /// `POST /sessions`
    CreateSession,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Meta(_) | Endpoint::Memory(_) | Endpoint::ListSessions => Method::Get,
            Endpoint::Chat | Endpoint::CreateSession => Method::Post,
        }
    }

    /// Path relative to the backend base URL, with the session segment
    /// percent-encoded
    pub fn path(&self) -> String {
        match self {
            Endpoint::Meta(session) => format!("/meta/{}", urlencoding::encode(session.as_str())),
            Endpoint::Memory(session) => {
                format!("/memory/{}", urlencoding::encode(session.as_str()))
            }
            Endpoint::Chat => "/chat".to_string(),
            Endpoint::ListSessions | Endpoint::CreateSession => "/sessions".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// A request/response exchange returning the parsed JSON body on success
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, endpoint: &Endpoint, body: Option<&Value>)
        -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn exchange(
        &self,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        (**self).exchange(endpoint, body).await
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport {
    inner: Arc<dyn Transport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn exchange(
        &self,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let start = Instant::now();
        let result = self.inner.exchange(endpoint, body).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    duration_ms = %duration.as_millis(),
                    "Backend request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "Backend request failed"
                );
            }
        }

        result
    }
}
