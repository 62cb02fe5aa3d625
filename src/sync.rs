//! Conversation synchronization state machine
//!
//! Implements the Elm Architecture pattern: [`transition`] is a pure
//! function from the current state and an event to a new state plus the
//! effects the runtime must carry out.

mod effect;
pub mod event;
mod snapshot;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use snapshot::Snapshot;
pub use state::{
    LoadingState, Message, OpId, Phase, Role, SessionTag, SyncState, FALLBACK_TITLE,
    HISTORY_LOAD_FAILED, PROMPT_SUGGESTIONS, SEND_FAILED,
};
pub use transition::{transition, TransitionError, TransitionResult};
