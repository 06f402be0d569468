//! SnapshotJoin - admits a new viewer to a session.
//!
//! # Sequence
//!
//! 1. Create the subscriber with its queue; nothing is sent yet
//! 2. Register it with the connection registry
//! 3. Read the session snapshot
//! 4. Send the snapshot directly on the connection
//! 5. Attach the queue to the connection; queued broadcasts follow
//!
//! Registration precedes the snapshot read, so a mutation racing the join
//! shows up in the snapshot, in a later broadcast, or in both, never in
//! neither. Broadcasts made during steps 2-4 wait in the queue, so they
//! reach the viewer after the snapshot.

use std::sync::Arc;

use thiserror::Error;

use crate::adapters::websocket::{
    ConnectionId, ConnectionRegistry, Subscriber, SESSION_NOT_FOUND_CLOSE_CODE,
    SESSION_NOT_FOUND_REASON,
};
use crate::domain::event::LiveEvent;
use crate::domain::foundation::SessionId;
use crate::ports::{DeliveryError, LiveConnection, SessionStore};

/// Why a join did not complete.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("session not found")]
    SessionNotFound,

    #[error("snapshot delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("server is shutting down")]
    ShuttingDown,
}

/// Runs the join sequence against a store and a registry.
#[derive(Clone)]
pub struct SnapshotJoin {
    store: Arc<dyn SessionStore>,
    registry: Arc<ConnectionRegistry>,
    outbound_buffer: usize,
    public_base_url: Option<String>,
}

impl SnapshotJoin {
    /// `outbound_buffer` bounds how many events may wait for one viewer.
    pub fn new(
        store: Arc<dyn SessionStore>,
        registry: Arc<ConnectionRegistry>,
        outbound_buffer: usize,
    ) -> Self {
        Self {
            store,
            registry,
            outbound_buffer,
            public_base_url: None,
        }
    }

    /// Fill `join_url` on the snapshot's session from this base.
    pub fn with_public_base_url(mut self, base: Option<String>) -> Self {
        self.public_base_url = base;
        self
    }

    /// Join `connection` to a session.
    ///
    /// On success the connection is registered, has received the snapshot
    /// and is drained by its writer task. On failure it is not registered;
    /// for an unknown session it has also been closed with the
    /// session-not-found close code.
    pub async fn join(
        &self,
        session_id: &SessionId,
        mut connection: Box<dyn LiveConnection>,
    ) -> Result<ConnectionId, JoinError> {
        let (subscriber, mailbox) = Subscriber::channel(self.outbound_buffer);
        let connection_id = subscriber.id();

        self.registry.connect(session_id, subscriber.clone()).await;

        let mut snapshot = match self.store.snapshot(session_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.registry.disconnect(session_id, &connection_id).await;
                tracing::debug!(session_id = %session_id, error = %e, "join rejected");
                connection
                    .close(SESSION_NOT_FOUND_CLOSE_CODE, SESSION_NOT_FOUND_REASON)
                    .await;
                return Err(JoinError::SessionNotFound);
            }
        };
        snapshot.session = snapshot
            .session
            .with_join_url(self.public_base_url.as_deref());

        if let Err(e) = connection.deliver(&LiveEvent::snapshot(&snapshot)).await {
            self.registry.disconnect(session_id, &connection_id).await;
            tracing::debug!(
                session_id = %session_id,
                connection_id = %connection_id,
                error = %e,
                "snapshot delivery failed"
            );
            return Err(e.into());
        }

        subscriber.attach(mailbox, connection).await;

        tracing::debug!(
            session_id = %session_id,
            connection_id = %connection_id,
            "viewer joined"
        );
        Ok(connection_id)
    }
}
