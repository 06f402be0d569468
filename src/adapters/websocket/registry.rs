//! Live connection registry with per-session fan-out.
//!
//! Subscribers are grouped by session, so a broadcast only reaches viewers
//! of the session it belongs to.
//!
//! # Architecture
//!
//! ```text
//! broadcast ──try_send──► [queue] ──► writer task ──► LiveConnection
//!                         (bounded)    (one per viewer)
//!
//! Session: 5f3c...       Session: 9a01...
//! ├── conn-a             ├── conn-d
//! ├── conn-b             └── conn-e
//! └── conn-c
//! ```
//!
//! # Locking
//!
//! The registry lock covers membership changes and the copy step of a
//! broadcast. Handing an event to a subscriber never waits: it is pushed
//! onto that subscriber's bounded queue, and a writer task owning the
//! connection sends it. A full or closed queue counts as a failed delivery
//! and the subscriber is removed in a second short lock acquisition.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::event::LiveEvent;
use crate::domain::foundation::SessionId;
use crate::ports::{DeliveryError, LiveConnection};

use super::messages::{LAGGING_CLOSE_CODE, LAGGING_REASON};

/// Unique identifier for one registered connection.
///
/// Generated server-side when a subscriber is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct CloseRequest {
    code: u16,
    reason: String,
}

/// Receiving side of a subscriber's queue, consumed by its writer task.
///
/// Events pushed before [`Subscriber::attach`] wait here, so whatever the
/// caller sends directly on the connection before attaching goes out first.
pub struct Mailbox {
    events: mpsc::Receiver<LiveEvent>,
    close: oneshot::Receiver<CloseRequest>,
}

impl Mailbox {
    async fn run(mut self, connection_id: ConnectionId, mut connection: Box<dyn LiveConnection>) {
        loop {
            tokio::select! {
                biased;
                request = &mut self.close => {
                    match request {
                        Ok(CloseRequest { code, reason }) => connection.close(code, &reason).await,
                        // Subscriber dropped from the registry without an explicit close.
                        Err(_) => connection.close(LAGGING_CLOSE_CODE, LAGGING_REASON).await,
                    }
                    return;
                }
                next = self.events.recv() => {
                    let Some(event) = next else {
                        connection.close(LAGGING_CLOSE_CODE, LAGGING_REASON).await;
                        return;
                    };
                    if let Err(e) = connection.deliver(&event).await {
                        tracing::debug!(
                            connection_id = %connection_id,
                            event_type = %event.kind,
                            error = %e,
                            "delivery failed, stopping writer"
                        );
                        connection.close(LAGGING_CLOSE_CODE, LAGGING_REASON).await;
                        return;
                    }
                }
            }
        }
    }
}

/// A registered viewer: the sending side of its queue plus its writer task.
pub struct Subscriber {
    id: ConnectionId,
    queue: mpsc::Sender<LiveEvent>,
    closer: Mutex<Option<oneshot::Sender<CloseRequest>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Subscriber {
    /// Create a subscriber whose queue holds up to `capacity` events.
    ///
    /// Nothing is sent until the returned mailbox is attached to a
    /// connection.
    pub fn channel(capacity: usize) -> (Arc<Self>, Mailbox) {
        let (queue, events) = mpsc::channel(capacity.max(1));
        let (closer, close) = oneshot::channel();
        let subscriber = Arc::new(Self {
            id: ConnectionId::new(),
            queue,
            closer: Mutex::new(Some(closer)),
            writer: Mutex::new(None),
        });
        (subscriber, Mailbox { events, close })
    }

    /// Create a subscriber already draining into `connection`.
    pub async fn spawn(connection: Box<dyn LiveConnection>, capacity: usize) -> Arc<Self> {
        let (subscriber, mailbox) = Self::channel(capacity);
        subscriber.attach(mailbox, connection).await;
        subscriber
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Start the writer task that drains the queue into `connection`.
    pub async fn attach(&self, mailbox: Mailbox, connection: Box<dyn LiveConnection>) {
        let writer = tokio::spawn(mailbox.run(self.id, connection));
        *self.writer.lock().await = Some(writer);
    }

    /// Queue an event without waiting.
    fn enqueue(&self, event: &LiveEvent) -> Result<(), DeliveryError> {
        self.queue.try_send(event.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Lagging,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Close the connection and wait for the writer task to finish.
    ///
    /// Events still queued are dropped. Before [`Subscriber::attach`] the
    /// request is kept and honored as soon as the writer starts.
    pub async fn close(&self, code: u16, reason: &str) {
        if let Some(closer) = self.closer.lock().await.take() {
            // Err means the writer already stopped on its own.
            let _ = closer.send(CloseRequest {
                code,
                reason: reason.to_string(),
            });
        }
        let writer = self.writer.lock().await.take();
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                tracing::warn!(connection_id = %self.id, error = %e, "writer task failed");
            }
        }
    }
}

/// Result of one broadcast call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Subscribers the event was queued for
    pub delivered: usize,
    pub pruned: usize,
}

/// Tracks live subscribers by session.
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: Mutex<HashMap<SessionId, Vec<Arc<Subscriber>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for a session. Every call adds a new entry.
    pub async fn connect(&self, session_id: &SessionId, subscriber: Arc<Subscriber>) {
        let mut sessions = self.sessions.lock().await;
        tracing::debug!(
            session_id = %session_id,
            connection_id = %subscriber.id,
            "connection registered"
        );
        sessions.entry(*session_id).or_default().push(subscriber);
    }

    /// Remove a subscriber. Removing one that is not registered is a no-op.
    pub async fn disconnect(&self, session_id: &SessionId, connection_id: &ConnectionId) {
        let mut sessions = self.sessions.lock().await;
        if let Some(subscribers) = sessions.get_mut(session_id) {
            subscribers.retain(|s| s.id != *connection_id);
            if subscribers.is_empty() {
                sessions.remove(session_id);
            }
            tracing::debug!(
                session_id = %session_id,
                connection_id = %connection_id,
                "connection removed"
            );
        }
    }

    /// Queue an event for every subscriber of a session.
    ///
    /// Never waits on a connection. Best effort and at most once: a
    /// subscriber whose queue is full or whose writer has stopped is
    /// dropped from the registry, and its connection is closed by its
    /// writer task.
    pub async fn broadcast(&self, session_id: &SessionId, event: &LiveEvent) -> BroadcastOutcome {
        let subscribers: Vec<Arc<Subscriber>> = {
            let sessions = self.sessions.lock().await;
            match sessions.get(session_id) {
                Some(subscribers) => subscribers.clone(),
                None => return BroadcastOutcome::default(),
            }
        };

        let mut failed = HashSet::new();
        for subscriber in &subscribers {
            if let Err(e) = subscriber.enqueue(event) {
                tracing::debug!(
                    session_id = %session_id,
                    connection_id = %subscriber.id,
                    event_type = %event.kind,
                    error = %e,
                    "delivery failed"
                );
                failed.insert(subscriber.id);
            }
        }

        let outcome = BroadcastOutcome {
            delivered: subscribers.len() - failed.len(),
            pruned: failed.len(),
        };

        if !failed.is_empty() {
            let mut sessions = self.sessions.lock().await;
            if let Some(current) = sessions.get_mut(session_id) {
                current.retain(|s| !failed.contains(&s.id));
                if current.is_empty() {
                    sessions.remove(session_id);
                }
            }
            tracing::warn!(
                session_id = %session_id,
                pruned = outcome.pruned,
                "pruned unreachable connections"
            );
        }

        outcome
    }

    /// Get count of subscribers for a session (0 if none).
    pub async fn connection_count(&self, session_id: &SessionId) -> usize {
        self.sessions
            .lock()
            .await
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Get total count of subscribers across all sessions.
    pub async fn total_connections(&self) -> usize {
        self.sessions.lock().await.values().map(Vec::len).sum()
    }

    /// Sessions with at least one subscriber.
    pub async fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions.lock().await.keys().copied().collect()
    }

    /// Remove every subscriber and close its connection.
    ///
    /// Returns the number of connections closed.
    pub async fn close_all(&self, code: u16, reason: &str) -> usize {
        let drained: Vec<Arc<Subscriber>> = {
            let mut sessions = self.sessions.lock().await;
            sessions.drain().flat_map(|(_, subscribers)| subscribers).collect()
        };

        join_all(drained.iter().map(|subscriber| subscriber.close(code, reason))).await;

        drained.len()
    }
}
