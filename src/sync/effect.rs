//! Effects produced by state transitions

use super::state::{OpId, SessionTag};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look up the session title (spawns as background task)
    FetchTitle { tag: SessionTag },

    /// Fetch the full transcript (spawns as background task)
    FetchHistory { tag: SessionTag, load: OpId },

    /// Ask the backend for a reply to `text` (spawns as background task)
    RequestReply {
        tag: SessionTag,
        send: OpId,
        text: String,
    },

    /// Push a fresh snapshot to subscribers
    Publish,

    /// Wake whoever is awaiting `op`
    Settle { op: OpId },

    /// The session changed; nobody awaiting an older op will see it settle
    AbandonWaiters,
}
