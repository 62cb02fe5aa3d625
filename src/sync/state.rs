//! Controller state types

use crate::session::SessionRef;
use serde::{Deserialize, Serialize};

/// Title shown until (or instead of) the backend-provided one
pub const FALLBACK_TITLE: &str = "Chat with AI";

/// Diagnostic transcript content when the history cannot be fetched
pub const HISTORY_LOAD_FAILED: &str = "⚠️ Failed to load chat history.";

/// Diagnostic turn appended when a send gets no usable reply
pub const SEND_FAILED: &str = "⚠️ Error contacting server.";

/// One-click prompts offered under the input
pub const PROMPT_SUGGESTIONS: [&str; 3] = [
    "Tell me a fun fact",
    "What's the weather like?",
    "Summarize our conversation",
];

// ============================================================================
// Transcript
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Parse a wire role; anything but `user`/`assistant` is not a turn
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Operation tagging
// ============================================================================

/// Identifier of one issued operation (a history load or a send)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub u64);

/// The session an in-flight operation was issued for.
///
/// The generation changes on every navigation, so a result issued before
/// leaving and re-entering the same session still counts as stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTag {
    pub session: SessionRef,
    pub generation: u64,
}

/// The history load whose result will be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub id: OpId,
    /// Turns appended after this load was issued; re-applied after the
    /// wholesale replace
    pub appended_since: Vec<Message>,
}

// ============================================================================
// Controller state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session resolved
    #[default]
    Uninitialized,
    /// Session resolved, initial history load in flight
    Loading,
    /// Initial history load settled
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingState {
    pub history_loading: bool,
    pub refreshing: bool,
    pub send_in_flight: bool,
}

/// Everything the controller knows about the active session
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
    pub session: Option<SessionRef>,
    /// Bumped on every session change
    pub generation: u64,
    pub phase: Phase,
    pub transcript: Vec<Message>,
    pub title: String,
    pub loading: LoadingState,
    /// Pending input buffer
    pub draft: String,
    pub active_load: Option<PendingLoad>,
    pub pending_send: Option<OpId>,
    pub next_op: u64,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            session: None,
            generation: 0,
            phase: Phase::Uninitialized,
            transcript: Vec::new(),
            title: FALLBACK_TITLE.to_string(),
            loading: LoadingState::default(),
            draft: String::new(),
            active_load: None,
            pending_send: None,
            next_op: 1,
        }
    }
}

impl SyncState {
    /// Tag for operations issued now, if a session is active
    pub fn tag(&self) -> Option<SessionTag> {
        self.session.as_ref().map(|session| SessionTag {
            session: session.clone(),
            generation: self.generation,
        })
    }

    /// Whether a result tagged `tag` still belongs to the active session
    pub fn is_current(&self, tag: &SessionTag) -> bool {
        tag.generation == self.generation && self.session.as_ref() == Some(&tag.session)
    }

    pub(crate) fn allocate_op(&mut self) -> OpId {
        let id = OpId(self.next_op);
        self.next_op += 1;
        id
    }

    /// Append a turn, remembering it for the pending load if one is in flight
    pub(crate) fn append(&mut self, message: Message) {
        if let Some(load) = self.active_load.as_mut() {
            load.appended_since.push(message.clone());
        }
        self.transcript.push(message);
    }
}
