//! Events that drive the controller

use super::state::{Message, OpId, SessionTag};
use crate::session::SessionRef;
use crate::transport::TransportError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Navigation
    SessionResolved {
        session: Option<SessionRef>,
    },

    // User events
    DraftChanged {
        text: String,
    },
    SendRequested {
        text: String,
    },
    SubmitDraft,
    SuggestionPicked {
        index: usize,
    },
    RefreshRequested,

    // Completions, each tagged with the session it was issued for
    TitleLoaded {
        tag: SessionTag,
        /// `None` when the lookup failed or carried no usable title
        title: Option<String>,
    },
    HistoryLoaded {
        tag: SessionTag,
        load: OpId,
        /// Already filtered to user/assistant turns
        result: Result<Vec<Message>, TransportError>,
    },
    ReplyReceived {
        tag: SessionTag,
        send: OpId,
        result: Result<String, TransportError>,
    },
}

impl Event {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionResolved { .. } => "session_resolved",
            Event::DraftChanged { .. } => "draft_changed",
            Event::SendRequested { .. } => "send_requested",
            Event::SubmitDraft => "submit_draft",
            Event::SuggestionPicked { .. } => "suggestion_picked",
            Event::RefreshRequested => "refresh_requested",
            Event::TitleLoaded { .. } => "title_loaded",
            Event::HistoryLoaded { .. } => "history_loaded",
            Event::ReplyReceived { .. } => "reply_received",
        }
    }
}
