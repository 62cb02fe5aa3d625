//! Read-only view handed to the rendering layer

use super::state::{Message, Phase, SyncState, PROMPT_SUGGESTIONS};
use crate::session::SessionRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub session: Option<SessionRef>,
    pub phase: Phase,
    pub transcript: Vec<Message>,
    pub title: String,
    pub history_loading: bool,
    pub refreshing: bool,
    pub send_in_flight: bool,
    pub draft: String,
    pub suggestions: &'static [&'static str],
}

impl Default for Snapshot {
    fn default() -> Self {
        SyncState::default().snapshot()
    }
}

impl Snapshot {
    /// The text input accepts edits
    pub fn input_enabled(&self) -> bool {
        !self.send_in_flight
    }

    /// The send control is active
    pub fn can_submit(&self) -> bool {
        self.session.is_some() && !self.send_in_flight && !self.draft.trim().is_empty()
    }

    /// The refresh control is active
    pub fn refresh_enabled(&self) -> bool {
        self.session.is_some() && !self.refreshing && !self.history_loading
    }

    /// Text shown in place of an empty or loading transcript
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.history_loading {
            Some("Loading chat history...")
        } else if self.session.is_some() && self.transcript.is_empty() {
            Some("No messages yet. Start the conversation!")
        } else {
            None
        }
    }
}

impl SyncState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            phase: self.phase,
            transcript: self.transcript.clone(),
            title: self.title.clone(),
            history_loading: self.loading.history_loading,
            refreshing: self.loading.refreshing,
            send_in_flight: self.loading.send_in_flight,
            draft: self.draft.clone(),
            suggestions: &PROMPT_SUGGESTIONS,
        }
    }
}
