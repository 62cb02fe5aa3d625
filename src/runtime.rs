//! Runtime for executing the synchronization controller
//!
//! One [`SyncRuntime`] task owns the [`SyncState`](crate::sync::SyncState)
//! and applies every event through [`transition`](crate::sync::transition).
//! Network effects run as separate tasks that post their tagged results
//! back onto the same channel.

mod executor;
mod handle;


pub use executor::SyncRuntime;
pub use handle::{ControllerError, Outcome, SyncHandle};

use crate::sync::{Event, Snapshot};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// An event plus, for caller-initiated events, where to report its outcome
#[derive(Debug)]
pub(crate) struct Envelope {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Outcome>>,
}

impl Envelope {
    pub fn completion(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Start a controller on the current tokio runtime and return its handle.
///
/// The controller stops once every handle is dropped and no backend request
/// is still in flight.
pub fn spawn<T: Transport + 'static>(transport: Arc<T>) -> SyncHandle {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());

    let runtime = SyncRuntime::new(transport, event_rx, event_tx.downgrade(), snapshot_tx);
    tokio::spawn(runtime.run());

    SyncHandle::new(event_tx, snapshot_rx)
}
