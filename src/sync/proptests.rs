//! Property-based tests for the synchronization state machine
//!
//! Random interleavings of navigation, user input and out-of-order
//! completions are replayed through `transition`, checking invariants after
//! every step.

use super::state::*;
use super::transition::*;
use super::*;
use crate::session::SessionRef;
use crate::transport::TransportError;
use proptest::prelude::*;

// ============================================================================
// Abstract actions
// ============================================================================

/// An action the driver turns into a concrete event against the live state
#[derive(Debug, Clone)]
enum Action {
    Navigate(Option<u8>),
    Send(String),
    EditDraft(String),
    Refresh,
    /// Complete the oldest outstanding history fetch
    CompleteHistory { ok: bool, len: usize },
    /// Complete the oldest outstanding reply request
    CompleteReply { ok: bool },
    CompleteTitle { ok: bool },
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        prop::option::of(0u8..3).prop_map(Action::Navigate),
        arb_text().prop_map(Action::Send),
        arb_text().prop_map(Action::EditDraft),
        Just(Action::Refresh),
        (any::<bool>(), 0usize..4).prop_map(|(ok, len)| Action::CompleteHistory { ok, len }),
        any::<bool>().prop_map(|ok| Action::CompleteReply { ok }),
        any::<bool>().prop_map(|ok| Action::CompleteTitle { ok }),
    ]
}

// ============================================================================
// Driver
// ============================================================================

/// Tracks effects that have been issued but not yet completed, including
/// ones whose session has since gone away
#[derive(Default)]
struct World {
    state: SyncState,
    histories: Vec<(SessionTag, OpId)>,
    replies: Vec<(SessionTag, OpId)>,
    titles: Vec<SessionTag>,
}

impl World {
    fn event_for(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Navigate(id) => Some(Event::SessionResolved {
                session: id.map(|n| SessionRef::new(format!("s{n}"))),
            }),
            Action::Send(text) => Some(Event::SendRequested { text }),
            Action::EditDraft(text) => Some(Event::DraftChanged { text }),
            Action::Refresh => Some(Event::RefreshRequested),
            Action::CompleteHistory { ok, len } => {
                if self.histories.is_empty() {
                    return None;
                }
                let (tag, load) = self.histories.remove(0);
                let result = if ok {
                    Ok((0..len).map(|i| Message::user(format!("h{i}"))).collect())
                } else {
                    Err(TransportError::connection("refused"))
                };
                Some(Event::HistoryLoaded { tag, load, result })
            }
            Action::CompleteReply { ok } => {
                if self.replies.is_empty() {
                    return None;
                }
                let (tag, send) = self.replies.remove(0);
                let result = if ok {
                    Ok("reply".to_string())
                } else {
                    Err(TransportError::timeout("slow"))
                };
                Some(Event::ReplyReceived { tag, send, result })
            }
            Action::CompleteTitle { ok } => {
                if self.titles.is_empty() {
                    return None;
                }
                let tag = self.titles.remove(0);
                Some(Event::TitleLoaded {
                    tag,
                    title: ok.then(|| "Title".to_string()),
                })
            }
        }
    }

    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, event)?;
        for effect in &result.effects {
            match effect {
                Effect::FetchHistory { tag, load } => self.histories.push((tag.clone(), *load)),
                Effect::RequestReply { tag, send, .. } => self.replies.push((tag.clone(), *send)),
                Effect::FetchTitle { tag } => self.titles.push(tag.clone()),
                Effect::Publish | Effect::Settle { .. } | Effect::AbandonWaiters => {}
            }
        }
        self.state = result.new_state;
        Ok(())
    }
}

fn check_invariants(state: &SyncState) -> Result<(), TestCaseError> {
    prop_assert_eq!(state.loading.send_in_flight, state.pending_send.is_some());
    prop_assert_eq!(state.loading.history_loading, state.active_load.is_some());
    if state.loading.refreshing {
        prop_assert!(state.loading.history_loading);
    }
    match state.phase {
        Phase::Uninitialized => {
            prop_assert!(state.session.is_none());
            prop_assert!(state.transcript.is_empty());
            prop_assert_eq!(state.loading, LoadingState::default());
        }
        Phase::Loading => {
            prop_assert!(state.session.is_some());
            prop_assert!(state.loading.history_loading);
            prop_assert!(!state.loading.refreshing);
        }
        Phase::Ready => prop_assert!(state.session.is_some()),
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Invariants hold after every step of any interleaving
    #[test]
    fn prop_invariants_hold(actions in prop::collection::vec(arb_action(), 1..60)) {
        let mut world = World::default();
        for action in actions {
            if let Some(event) = world.event_for(action) {
                let _ = world.apply(event);
            }
            check_invariants(&world.state)?;
        }
    }

    /// Rejected events never change state
    #[test]
    fn prop_rejections_leave_state_untouched(
        actions in prop::collection::vec(arb_action(), 1..60)
    ) {
        let mut world = World::default();
        for action in actions {
            let Some(event) = world.event_for(action) else { continue };
            let before = world.state.clone();
            if transition(&before, event.clone()).is_err() {
                prop_assert!(world.apply(event).is_err());
                prop_assert_eq!(&world.state, &before);
            } else {
                world.apply(event).unwrap();
            }
        }
    }

    /// Blank sends are no-ops whatever the state
    #[test]
    fn prop_blank_send_is_noop(
        actions in prop::collection::vec(arb_action(), 0..30),
        blank in "[ \t\n]{0,5}",
    ) {
        let mut world = World::default();
        for action in actions {
            if let Some(event) = world.event_for(action) {
                let _ = world.apply(event);
            }
        }
        let result = transition(&world.state, Event::SendRequested { text: blank });
        prop_assert!(result.is_err());
    }

    /// Once every outstanding fetch has completed, nothing is left loading
    #[test]
    fn prop_settled_loads_clear_flag(
        actions in prop::collection::vec(arb_action(), 1..40),
        ok in any::<bool>(),
    ) {
        let mut world = World::default();
        for action in actions {
            if let Some(event) = world.event_for(action) {
                let _ = world.apply(event);
            }
        }
        while let Some(event) = world.event_for(Action::CompleteHistory { ok, len: 1 }) {
            let _ = world.apply(event);
        }
        prop_assert!(!world.state.loading.history_loading);
        prop_assert!(!world.state.loading.refreshing);
    }

    /// A successful send grows the transcript by exactly user + reply
    #[test]
    fn prop_send_round_trip(text in "[a-z]{1,12}", ok in any::<bool>()) {
        let mut world = World::default();
        world.apply(Event::SessionResolved { session: Some(SessionRef::new("s0")) }).unwrap();
        let load = world.event_for(Action::CompleteHistory { ok: true, len: 2 }).unwrap();
        world.apply(load).unwrap();
        let before = world.state.transcript.len();

        world.apply(Event::SendRequested { text: text.clone() }).unwrap();
        let reply = world.event_for(Action::CompleteReply { ok }).unwrap();
        world.apply(reply).unwrap();

        let transcript = &world.state.transcript;
        prop_assert_eq!(transcript.len(), before + 2);
        prop_assert_eq!(&transcript[before], &Message::user(text));
        let expected = if ok { "reply" } else { SEND_FAILED };
        prop_assert_eq!(&transcript[before + 1], &Message::assistant(expected));
        prop_assert!(!world.state.loading.send_in_flight);
    }
}
