//! Pure state transition function
//!
//! Every mutation of the transcript and loading flags happens here, so
//! admission checks and stale-result suppression do not depend on the
//! rendering layer disabling its controls.

use super::state::{
    Message, OpId, PendingLoad, Phase, SyncState, FALLBACK_TITLE, HISTORY_LOAD_FAILED,
    PROMPT_SUGGESTIONS, SEND_FAILED,
};
use super::{Effect, Event};
use crate::session::SessionRef;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SyncState,
    pub effects: Vec<Effect>,
    /// Operation started by this transition, settled later by `Effect::Settle`
    pub started: Option<OpId>,
}

impl TransitionResult {
    pub fn new(state: SyncState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
            started: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn started(mut self, op: OpId) -> Self {
        self.started = Some(op);
        self
    }
}

/// Reasons an event is ignored. None of these are failures: the state is
/// left untouched and the controller stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A message is already being sent")]
    SendInFlight,
    #[error("History is already loading")]
    RefreshInProgress,
    #[error("No session is open")]
    NoSession,
    #[error("No prompt suggestion at index {0}")]
    UnknownSuggestion(usize),
    #[error("Result belongs to a session that is no longer active")]
    StaleResult,
}

/// Pure transition function
///
/// Given the same state and event this always produces the same result,
/// with no I/O.
pub fn transition(state: &SyncState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Navigation
        // ============================================================
        Event::SessionResolved { session } => Ok(resolve_session(state, session)),

        // ============================================================
        // User input
        // ============================================================
        Event::DraftChanged { text } => {
            if state.loading.send_in_flight {
                return Err(TransitionError::SendInFlight);
            }
            let mut next = state.clone();
            next.draft = text;
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        Event::SendRequested { text } => send(state, text),

        Event::SubmitDraft => send(state, state.draft.clone()),

        Event::SuggestionPicked { index } => {
            let text = PROMPT_SUGGESTIONS
                .get(index)
                .ok_or(TransitionError::UnknownSuggestion(index))?;
            send(state, (*text).to_string())
        }

        Event::RefreshRequested => {
            let Some(tag) = state.tag() else {
                return Err(TransitionError::NoSession);
            };
            if state.loading.refreshing || state.loading.history_loading {
                return Err(TransitionError::RefreshInProgress);
            }

            let mut next = state.clone();
            let load = next.allocate_op();
            next.loading.refreshing = true;
            next.loading.history_loading = true;
            next.active_load = Some(PendingLoad {
                id: load,
                appended_since: Vec::new(),
            });

            Ok(TransitionResult::new(next)
                .with_effect(Effect::Publish)
                .with_effect(Effect::FetchHistory { tag, load })
                .started(load))
        }

        // ============================================================
        // Completions
        // ============================================================
        Event::TitleLoaded { tag, title } => {
            if !state.is_current(&tag) {
                return Err(TransitionError::StaleResult);
            }
            let mut next = state.clone();
            next.title = title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_TITLE.to_string());
            Ok(TransitionResult::new(next).with_effect(Effect::Publish))
        }

        Event::HistoryLoaded { tag, load, result } => {
            // One load per generation at most, so a current tag means this
            // is the pending load
            let pending = state
                .active_load
                .as_ref()
                .filter(|p| state.is_current(&tag) && p.id == load)
                .ok_or(TransitionError::StaleResult)?;

            let fetched = match result {
                Ok(messages) => messages,
                Err(_) => vec![Message::assistant(HISTORY_LOAD_FAILED)],
            };

            let mut next = state.clone();
            next.transcript = reconcile(fetched, &pending.appended_since);
            next.active_load = None;
            next.phase = Phase::Ready;
            // Clearing history_loading is the last mutation of a load
            next.loading.refreshing = false;
            next.loading.history_loading = false;

            Ok(TransitionResult::new(next).with_effects([
                Effect::Publish,
                Effect::Settle { op: load },
            ]))
        }

        Event::ReplyReceived { tag, send, result } => {
            if !state.is_current(&tag) || state.pending_send != Some(send) {
                return Err(TransitionError::StaleResult);
            }

            let reply = match result {
                Ok(reply) => Message::assistant(reply),
                Err(_) => Message::assistant(SEND_FAILED),
            };

            let mut next = state.clone();
            next.append(reply);
            next.pending_send = None;
            next.loading.send_in_flight = false;

            Ok(TransitionResult::new(next).with_effects([
                Effect::Publish,
                Effect::Settle { op: send },
            ]))
        }
    }
}

/// Start over for a newly resolved session
fn resolve_session(state: &SyncState, session: Option<SessionRef>) -> TransitionResult {
    if session == state.session {
        return TransitionResult::new(state.clone());
    }

    let mut next = SyncState {
        session,
        generation: state.generation + 1,
        next_op: state.next_op,
        ..SyncState::default()
    };

    let Some(tag) = next.tag() else {
        return TransitionResult::new(next).with_effects([Effect::AbandonWaiters, Effect::Publish]);
    };

    let load = next.allocate_op();
    next.phase = Phase::Loading;
    next.loading.history_loading = true;
    next.active_load = Some(PendingLoad {
        id: load,
        appended_since: Vec::new(),
    });

    TransitionResult::new(next).with_effects([
        Effect::AbandonWaiters,
        Effect::Publish,
        Effect::FetchTitle { tag: tag.clone() },
        Effect::FetchHistory { tag, load },
    ])
}

/// Optimistically append the user turn and request a reply
fn send(state: &SyncState, text: String) -> Result<TransitionResult, TransitionError> {
    let Some(tag) = state.tag() else {
        return Err(TransitionError::NoSession);
    };
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyMessage);
    }
    if state.loading.send_in_flight {
        return Err(TransitionError::SendInFlight);
    }

    let mut next = state.clone();
    let op = next.allocate_op();
    next.append(Message::user(text.clone()));
    next.draft.clear();
    next.loading.send_in_flight = true;
    next.pending_send = Some(op);

    Ok(TransitionResult::new(next)
        .with_effect(Effect::Publish)
        .with_effect(Effect::RequestReply { tag, send: op, text })
        .started(op))
}

/// Replace the transcript with `fetched`, then re-apply every turn appended
/// while the load was in flight. Identical turns are legitimate, so nothing is
/// matched against the fetched tail.
fn reconcile(mut fetched: Vec<Message>, appended: &[Message]) -> Vec<Message> {
    fetched.extend_from_slice(appended);
    fetched
}
