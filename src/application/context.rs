//! LiveContext - the owned handle to the store, registry and coordinators.
//!
//! Built once at startup and cloned into every HTTP and WebSocket handler.
//!
//! ```text
//! LiveContext (Arc)
//! ├── store:       Arc<dyn SessionStore>
//! ├── registry:    Arc<ConnectionRegistry>
//! ├── broadcaster: BroadcastCoordinator  (store + registry)
//! └── joiner:      SnapshotJoin          (store + registry)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::memory::InMemorySessionStore;
use crate::adapters::websocket::{
    ConnectionId, ConnectionRegistry, GOING_AWAY_CLOSE_CODE, SERVER_SHUTDOWN_REASON,
};
use crate::config::{AppConfig, RealtimeConfig};
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{LiveConnection, SessionStore};

use super::broadcast::BroadcastCoordinator;
use super::join::{JoinError, SnapshotJoin};

struct Inner {
    store: Arc<dyn SessionStore>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: BroadcastCoordinator,
    joiner: SnapshotJoin,
    realtime: RealtimeConfig,
    public_base_url: Option<String>,
    running: AtomicBool,
}

/// Explicit application context with a start/stop lifecycle.
///
/// Joins are refused until [`LiveContext::start`] is called and again after
/// [`LiveContext::stop`].
#[derive(Clone)]
pub struct LiveContext {
    inner: Arc<Inner>,
}

impl LiveContext {
    /// Build a context backed by the in-memory store.
    pub fn new(config: &AppConfig) -> Self {
        if config.store.event_log_unbounded() {
            tracing::warn!(
                "store.event_log_capacity is unset; per-session event logs will grow without bound"
            );
        }
        let store = Arc::new(InMemorySessionStore::new(config.store.clone()));
        Self::with_store(
            store,
            config.realtime.clone(),
            config.server.public_base_url(),
        )
    }

    /// Build a context around any store implementation.
    ///
    /// `public_base_url` fills `join_url` on sessions leaving the server.
    pub fn with_store(
        store: Arc<dyn SessionStore>,
        realtime: RealtimeConfig,
        public_base_url: Option<String>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let joiner = SnapshotJoin::new(store.clone(), registry.clone(), realtime.outbound_buffer)
            .with_public_base_url(public_base_url.clone());
        Self {
            inner: Arc::new(Inner {
                broadcaster: BroadcastCoordinator::new(store.clone(), registry.clone()),
                joiner,
                store,
                registry,
                realtime,
                public_base_url,
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn start(&self) {
        if !self.inner.running.swap(true, Ordering::SeqCst) {
            tracing::info!("live context started");
        }
    }

    /// Stop accepting viewers and close every open connection.
    pub async fn stop(&self) {
        if self.inner.running.swap(false, Ordering::SeqCst) {
            let closed = self
                .inner
                .registry
                .close_all(GOING_AWAY_CLOSE_CODE, SERVER_SHUTDOWN_REASON)
                .await;
            tracing::info!(closed, "live context stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Admit a viewer to a session (see [`SnapshotJoin`]).
    pub async fn join(
        &self,
        session_id: &SessionId,
        mut connection: Box<dyn LiveConnection>,
    ) -> Result<ConnectionId, JoinError> {
        if !self.is_running() {
            connection
                .close(GOING_AWAY_CLOSE_CODE, SERVER_SHUTDOWN_REASON)
                .await;
            return Err(JoinError::ShuttingDown);
        }
        self.inner.joiner.join(session_id, connection).await
    }

    pub async fn leave(&self, session_id: &SessionId, connection_id: &ConnectionId) {
        self.inner.registry.disconnect(session_id, connection_id).await;
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.inner.registry
    }

    pub fn broadcaster(&self) -> &BroadcastCoordinator {
        &self.inner.broadcaster
    }

    pub fn send_timeout(&self) -> Duration {
        self.inner.realtime.send_timeout()
    }

    /// Fill in `join_url` for a session leaving the server.
    pub fn with_join_url(&self, session: Session) -> Session {
        session.with_join_url(self.inner.public_base_url.as_deref())
    }
}
