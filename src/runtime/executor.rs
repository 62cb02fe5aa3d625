//! Controller runtime executor

use super::{Envelope, Outcome};
use crate::loaders;
use crate::sync::{transition, Effect, Event, OpId, Snapshot, SyncState};
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Generic controller runtime that can work with any transport
pub struct SyncRuntime<T>
where
    T: Transport + 'static,
{
    state: SyncState,
    transport: Arc<T>,
    event_rx: mpsc::Receiver<Envelope>,
    /// Weak so that background tasks, not the runtime itself, keep the
    /// channel open
    event_tx: mpsc::WeakSender<Envelope>,
    snapshot_tx: watch::Sender<Snapshot>,
    /// Callers awaiting a send or refresh to settle
    waiters: HashMap<OpId, oneshot::Sender<Outcome>>,
}

impl<T> SyncRuntime<T>
where
    T: Transport + 'static,
{
    pub(crate) fn new(
        transport: Arc<T>,
        event_rx: mpsc::Receiver<Envelope>,
        event_tx: mpsc::WeakSender<Envelope>,
        snapshot_tx: watch::Sender<Snapshot>,
    ) -> Self {
        Self {
            state: SyncState::default(),
            transport,
            event_rx,
            event_tx,
            snapshot_tx,
            waiters: HashMap::new(),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting sync controller");

        while let Some(envelope) = self.event_rx.recv().await {
            self.process_event(envelope);
        }

        tracing::info!(
            session = ?self.state.session,
            "Sync controller stopped"
        );
    }

    fn process_event(&mut self, envelope: Envelope) {
        let Envelope { event, reply } = envelope;
        let kind = event.kind();

        // Pure state transition
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(event = kind, reason = %e, "Event ignored");
                if let Some(reply) = reply {
                    let _ = reply.send(Outcome::Ignored(e));
                }
                return;
            }
        };

        self.state = result.new_state;

        // Long-running operations settle later; everything else is done once
        // its effects have run, so the caller sees the published snapshot.
        let reply = match (reply, result.started) {
            (Some(reply), Some(op)) => {
                self.waiters.insert(op, reply);
                None
            }
            (reply, _) => reply,
        };

        for effect in result.effects {
            self.execute_effect(effect);
        }

        if let Some(reply) = reply {
            let _ = reply.send(Outcome::Settled);
        }
    }

    /// Execute an effect. Backend requests are spawned; everything else is
    /// applied inline.
    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Publish => {
                self.snapshot_tx.send_replace(self.state.snapshot());
            }

            Effect::Settle { op } => {
                if let Some(waiter) = self.waiters.remove(&op) {
                    let _ = waiter.send(Outcome::Settled);
                }
            }

            Effect::AbandonWaiters => {
                if !self.waiters.is_empty() {
                    tracing::debug!(
                        count = self.waiters.len(),
                        "Abandoning waiters for previous session"
                    );
                }
                for (_, waiter) in self.waiters.drain() {
                    let _ = waiter.send(Outcome::Superseded);
                }
                tracing::info!(
                    session = ?self.state.session,
                    generation = self.state.generation,
                    "Session changed"
                );
            }

            Effect::FetchTitle { tag } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    return;
                };
                let transport = self.transport.clone();

                tokio::spawn(async move {
                    let title = loaders::load_title(transport.as_ref(), &tag.session).await;
                    if title.is_none() {
                        tracing::info!(session = %tag.session, "Using fallback title");
                    }
                    let _ = event_tx
                        .send(Envelope::completion(Event::TitleLoaded { tag, title }))
                        .await;
                });
            }

            Effect::FetchHistory { tag, load } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    return;
                };
                let transport = self.transport.clone();

                tokio::spawn(async move {
                    tracing::debug!(
                        session = %tag.session,
                        load_id = load.0,
                        "Loading history (background)"
                    );
                    let result = loaders::load_history(transport.as_ref(), &tag.session).await;
                    match &result {
                        Ok(messages) => tracing::info!(
                            session = %tag.session,
                            messages = messages.len(),
                            "History loaded"
                        ),
                        Err(e) => tracing::warn!(
                            session = %tag.session,
                            error = %e,
                            "History load failed, showing diagnostic"
                        ),
                    }
                    let _ = event_tx
                        .send(Envelope::completion(Event::HistoryLoaded { tag, load, result }))
                        .await;
                });
            }

            Effect::RequestReply { tag, send, text } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    return;
                };
                let transport = self.transport.clone();

                tokio::spawn(async move {
                    tracing::debug!(
                        session = %tag.session,
                        send = send.0,
                        "Requesting reply (background)"
                    );
                    let result =
                        loaders::request_reply(transport.as_ref(), &tag.session, &text).await;
                    if let Err(e) = &result {
                        tracing::warn!(
                            session = %tag.session,
                            error = %e,
                            "Send failed, appending diagnostic"
                        );
                    }
                    let _ = event_tx
                        .send(Envelope::completion(Event::ReplyReceived { tag, send, result }))
                        .await;
                });
            }
        }
    }
}
