//! Session store: single owner of [`ResearchState`] with durable mirroring.
//!
//! The store is constructed once near the top of the application and handed
//! out as clonable [`StoreHandle`]s, so any view can read the current state
//! without ambient globals. All writes funnel through the store (single
//! writer); each committed update runs one reconciliation pass against the
//! durable snapshot and then notifies every subscriber.

mod reconcile;

pub use reconcile::{plan, Reconciliation};

use std::sync::{Arc, RwLock, Weak};

use tokio::sync::broadcast;

use crate::db::{SnapshotRepository, SnapshotStorage};
use crate::state::ResearchState;

/// Key under which the session snapshot is persisted.
pub const SNAPSHOT_KEY: &str = "research";

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A handle was used after its owning store was dropped. This is a
    /// wiring mistake in how the application is composed, not a runtime
    /// condition to recover from.
    #[error("Store handle used outside the owning store's lifetime")]
    OutOfScope,
}

/// Watcher errors.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Store dropped")]
    Closed,
    #[error("Lagged behind by {0} notifications")]
    Lagged(u64),
}

/// Why subscribers were notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new state was committed through the store.
    Updated,
    /// The durable snapshot was adopted into an uninitialized session.
    Recovered,
}

struct Inner {
    state: RwLock<ResearchState>,
    storage: Box<dyn SnapshotStorage>,
    events: broadcast::Sender<StoreEvent>,
}

impl Inner {
    fn current(&self) -> ResearchState {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn commit(&self, next: ResearchState) {
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            *state = next;
        }
        self.reconcile();
        let _ = self.events.send(StoreEvent::Updated);
    }

    /// One reconciliation pass between memory and the durable snapshot.
    ///
    /// Persistence is fire-and-forget: failures are logged and dropped, and
    /// malformed stored data reads as absent.
    fn reconcile(&self) -> Reconciliation {
        let memory = self.current();
        let durable = self
            .storage
            .read(SNAPSHOT_KEY)
            .and_then(|raw| ResearchState::from_json_lenient(&raw));

        let action = reconcile::plan(durable.as_ref(), &memory);
        tracing::debug!("Snapshot reconciliation: {action:?}");

        match action {
            Reconciliation::AdoptSnapshot => {
                if let Some(snapshot) = durable {
                    let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                    *state = snapshot;
                }
            }
            Reconciliation::WriteSnapshot => match serde_json::to_string(&memory) {
                Ok(raw) => {
                    if let Err(e) = self.storage.write(SNAPSHOT_KEY, &raw) {
                        tracing::warn!("Failed to persist research snapshot: {e}");
                    }
                }
                Err(e) => tracing::warn!("Failed to serialize research snapshot: {e}"),
            },
            Reconciliation::Noop => {}
        }

        action
    }
}

/// Owner of the session state.
pub struct ResearchStore {
    inner: Arc<Inner>,
}

impl ResearchStore {
    /// Create a store over the given storage backend.
    ///
    /// Runs one reconciliation pass immediately, which either recovers a
    /// previous session from the durable snapshot or seeds an empty one.
    pub fn new(storage: impl SnapshotStorage + 'static) -> Self {
        let (events, _) = broadcast::channel(64);
        let inner = Arc::new(Inner {
            state: RwLock::new(ResearchState::default()),
            storage: Box::new(storage),
            events,
        });

        if inner.reconcile() == Reconciliation::AdoptSnapshot {
            let _ = inner.events.send(StoreEvent::Recovered);
        }

        Self { inner }
    }

    /// Create a store over the default SQLite database.
    pub fn open() -> anyhow::Result<Self> {
        Ok(Self::new(SnapshotRepository::open()?))
    }

    /// Current state.
    pub fn state(&self) -> ResearchState {
        self.inner.current()
    }

    /// A clonable handle for consumers.
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> StoreWatcher {
        StoreWatcher {
            rx: self.inner.events.subscribe(),
        }
    }
}

/// Consumer-side surface of the store.
///
/// Handles hold a weak reference: using one after the store is gone is a
/// configuration error ([`StoreError::OutOfScope`]), distinct from a normal
/// empty session.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Weak<Inner>,
}

impl StoreHandle {
    fn upgrade(&self) -> Result<Arc<Inner>, StoreError> {
        self.inner.upgrade().ok_or(StoreError::OutOfScope)
    }

    /// Current state.
    pub fn state(&self) -> Result<ResearchState, StoreError> {
        Ok(self.upgrade()?.current())
    }

    /// Replace the state wholesale.
    pub fn replace(&self, next: ResearchState) -> Result<(), StoreError> {
        self.upgrade()?.commit(next);
        Ok(())
    }

    /// Reducer-style update: compute the next state from the previous one.
    pub fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&ResearchState) -> ResearchState,
    {
        let inner = self.upgrade()?;
        let next = f(&inner.current());
        inner.commit(next);
        Ok(())
    }

    /// Wipe the progress logs, keeping everything else.
    ///
    /// The chat panel does this right before starting a new research run.
    pub fn clear_logs(&self) -> Result<(), StoreError> {
        self.update(|state| {
            let mut next = state.clone();
            next.logs.clear();
            next
        })
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> Result<StoreWatcher, StoreError> {
        Ok(StoreWatcher {
            rx: self.upgrade()?.events.subscribe(),
        })
    }
}

/// Receiver half of the store's notification channel.
pub struct StoreWatcher {
    rx: broadcast::Receiver<StoreEvent>,
}

impl StoreWatcher {
    /// Wait for the next notification.
    pub async fn recv(&mut self) -> Result<StoreEvent, WatchError> {
        self.rx.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => WatchError::Closed,
            broadcast::error::RecvError::Lagged(n) => WatchError::Lagged(n),
        })
    }

    /// Poll for a notification without waiting.
    pub fn try_recv(&mut self) -> Result<Option<StoreEvent>, WatchError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(WatchError::Closed),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Err(WatchError::Lagged(n)),
        }
    }
}
