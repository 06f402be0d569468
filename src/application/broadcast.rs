//! BroadcastCoordinator - records and fans out events after a mutation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::adapters::websocket::{BroadcastOutcome, ConnectionRegistry};
use crate::domain::event::LiveEvent;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Sequences the two steps that follow every successful mutation:
/// append the event to the session log, then hand it to the registry.
///
/// Each session has an ordering gate. [`commit`](Self::commit) holds it
/// from the mutation until its events are queued, so the log and every
/// viewer see events in the order the store applied the mutations.
///
/// Owns neither the store nor the registry. Never fails: a logging failure
/// is reported and the broadcast still happens.
#[derive(Clone)]
pub struct BroadcastCoordinator {
    store: Arc<dyn SessionStore>,
    registry: Arc<ConnectionRegistry>,
    gates: Arc<Mutex<HashMap<SessionId, Arc<Mutex<()>>>>>,
}

impl BroadcastCoordinator {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn gate(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .await
            .entry(*session_id)
            .or_default()
            .clone()
    }

    /// Run a store mutation and publish the events it produces.
    ///
    /// `events` only runs when the mutation succeeds; a failed mutation
    /// publishes nothing and its error is returned unchanged.
    pub async fn commit<T, E, F, G>(
        &self,
        session_id: &SessionId,
        mutation: F,
        events: G,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        G: FnOnce(&T) -> Vec<LiveEvent>,
    {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;

        let value = mutation.await?;
        for event in events(&value) {
            self.dispatch(session_id, event).await;
        }
        Ok(value)
    }

    /// Record and broadcast one event.
    pub async fn publish(&self, session_id: &SessionId, event: LiveEvent) -> BroadcastOutcome {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;
        self.dispatch(session_id, event).await
    }

    /// Publish several events in order with no other event in between.
    pub async fn publish_all(&self, session_id: &SessionId, events: Vec<LiveEvent>) {
        let gate = self.gate(session_id).await;
        let _turn = gate.lock().await;
        for event in events {
            self.dispatch(session_id, event).await;
        }
    }

    async fn dispatch(&self, session_id: &SessionId, event: LiveEvent) -> BroadcastOutcome {
        if let Err(e) = self.store.record_event(session_id, event.clone()).await {
            tracing::warn!(
                session_id = %session_id,
                event_type = %event.kind,
                error = %e,
                "failed to record event"
            );
        }

        let outcome = self.registry.broadcast(session_id, &event).await;
        tracing::debug!(
            session_id = %session_id,
            event_type = %event.kind,
            delivered = outcome.delivered,
            pruned = outcome.pruned,
            "event published"
        );
        outcome
    }
}
