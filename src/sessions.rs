//! Session list and creation
//!
//! Used by the session picker rather than the controller, so failures are
//! returned to the caller instead of degrading to a fallback.

use crate::session::SessionRef;
use crate::transport::{Endpoint, Transport, TransportError};
use crate::wire::{CreateSessionResponse, SessionSummary};
use serde_json::json;

/// All sessions, newest first
pub async fn list_sessions(
    transport: &dyn Transport,
) -> Result<Vec<SessionSummary>, TransportError> {
    let value = transport.exchange(&Endpoint::ListSessions, None).await?;
    let mut sessions: Vec<SessionSummary> = serde_json::from_value(value)?;
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
}

/// Create an empty session and return its id
pub async fn create_session(transport: &dyn Transport) -> Result<SessionRef, TransportError> {
    let value = transport
        .exchange(&Endpoint::CreateSession, Some(&json!({})))
        .await?;
    let created: CreateSessionResponse = serde_json::from_value(value)?;
    tracing::info!(session = %created.id, "Created session");
    Ok(SessionRef::new(created.id))
}
