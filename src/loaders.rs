//! Backend calls behind the controller's effects
//!
//! These functions only talk to the transport and decode bodies; turning a
//! failure into a fallback title or diagnostic turn is the state machine's
//! job.

use crate::session::SessionRef;
use crate::sync::{Message, Role};
use crate::transport::{Endpoint, Transport, TransportError};
use crate::wire::{ChatRequest, ChatResponse, HistoryEntry, MetaResponse};

/// Look up the human-readable session title.
///
/// Returns `None` if the lookup fails or the body has no usable title; the
/// caller falls back to the default title in that case.
pub async fn load_title(transport: &dyn Transport, session: &SessionRef) -> Option<String> {
    let value = transport
        .exchange(&Endpoint::Meta(session.clone()), None)
        .await
        .ok()?;

    match serde_json::from_value::<MetaResponse>(value) {
        Ok(meta) => meta
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::debug!(session = %session, error = %e, "Malformed metadata response");
            None
        }
    }
}

/// Fetch the full transcript, keeping only user and assistant turns
pub async fn load_history(
    transport: &dyn Transport,
    session: &SessionRef,
) -> Result<Vec<Message>, TransportError> {
    let value = transport
        .exchange(&Endpoint::Memory(session.clone()), None)
        .await?;
    let entries: Vec<HistoryEntry> = serde_json::from_value(value)?;

    let total = entries.len();
    let messages: Vec<Message> = entries
        .into_iter()
        .filter_map(|entry| {
            Role::parse(&entry.role).map(|role| Message {
                role,
                content: entry.content,
            })
        })
        .collect();

    if messages.len() < total {
        tracing::debug!(
            session = %session,
            dropped = total - messages.len(),
            "Dropped history entries with non-conversational roles"
        );
    }
    Ok(messages)
}

/// Send one user turn and return the agent's reply
pub async fn request_reply(
    transport: &dyn Transport,
    session: &SessionRef,
    text: &str,
) -> Result<String, TransportError> {
    let body = serde_json::to_value(ChatRequest {
        message: text,
        session_id: session.as_str(),
    })?;
    let value = transport.exchange(&Endpoint::Chat, Some(&body)).await?;
    let response: ChatResponse = serde_json::from_value(value)?;
    response
        .into_reply()
        .ok_or_else(|| TransportError::decode("Chat response has no reply"))
}
