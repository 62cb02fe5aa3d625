//! Cloneable entry point into a running controller

use super::Envelope;
use crate::session::{resolve_route, route_for, SessionRef};
use crate::sync::{Event, Snapshot, TransitionError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// What became of a request made through [`SyncHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Applied; for sends and refreshes, the operation has fully settled
    Settled,
    /// Rejected as a no-op (blank message, send already in flight, ...)
    Ignored(TransitionError),
    /// The session changed before the operation settled
    Superseded,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Sync controller has stopped")]
    Stopped,
}

#[derive(Clone)]
pub struct SyncHandle {
    event_tx: mpsc::Sender<Envelope>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl SyncHandle {
    pub(crate) fn new(
        event_tx: mpsc::Sender<Envelope>,
        snapshot_rx: watch::Receiver<Snapshot>,
    ) -> Self {
        Self {
            event_tx,
            snapshot_rx,
        }
    }

    async fn dispatch(&self, event: Event) -> Result<Outcome, ControllerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.event_tx
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| ControllerError::Stopped)?;
        reply_rx.await.map_err(|_| ControllerError::Stopped)
    }

    /// Re-resolve the active session from a navigation route. Returns once
    /// the switch is applied; the title and history arrive afterwards.
    pub async fn navigate(&self, route: &str) -> Result<Outcome, ControllerError> {
        let session = resolve_route(route);
        tracing::debug!(route, session = ?session, "Navigating");
        self.dispatch(Event::SessionResolved { session }).await
    }

    pub async fn open(&self, session: &SessionRef) -> Result<Outcome, ControllerError> {
        self.navigate(&route_for(session)).await
    }

    /// Send a user turn. Resolves after the reply (or diagnostic) has been
    /// appended.
    pub async fn send(&self, text: impl Into<String>) -> Result<Outcome, ControllerError> {
        self.dispatch(Event::SendRequested { text: text.into() }).await
    }

    /// Send whatever is in the input buffer
    pub async fn submit_draft(&self) -> Result<Outcome, ControllerError> {
        self.dispatch(Event::SubmitDraft).await
    }

    pub async fn send_suggestion(&self, index: usize) -> Result<Outcome, ControllerError> {
        self.dispatch(Event::SuggestionPicked { index }).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<Outcome, ControllerError> {
        self.dispatch(Event::DraftChanged { text: text.into() }).await
    }

    /// Reload the history. Resolves after the reload has settled.
    pub async fn refresh(&self) -> Result<Outcome, ControllerError> {
        self.dispatch(Event::RefreshRequested).await
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&Snapshot) -> bool,
    ) -> Result<Snapshot, ControllerError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| ControllerError::Stopped)?;
        Ok(snapshot.clone())
    }
}
