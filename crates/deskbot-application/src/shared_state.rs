//! Shared application state with write-through persistence.
//!
//! `SharedState` owns the [`AssistantState`] behind an async `RwLock` and
//! pairs every mutation with a save of the persisted snapshot, so the blob
//! on disk never lags behind what other tasks can observe.

use deskbot_core::error::Result;
use deskbot_core::state::{AssistantState, StateStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handle to the single state tree shared by all use cases.
#[derive(Clone)]
pub struct SharedState {
    state: Arc<RwLock<AssistantState>>,
    store: Arc<dyn StateStore>,
}

impl SharedState {
    /// Hydrates state from the store, or starts from defaults when the
    /// store holds nothing yet.
    pub async fn load_or_default(store: Arc<dyn StateStore>) -> Result<Self> {
        let state = match store.load().await? {
            Some(persisted) => {
                tracing::debug!(target: "state", "hydrating persisted state");
                AssistantState::hydrate(persisted)
            }
            None => {
                tracing::debug!(target: "state", "no persisted state, starting from defaults");
                AssistantState::default()
            }
        };
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            store,
        })
    }

    /// Runs `f` against the state under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&AssistantState) -> R) -> R {
        let guard = self.state.read().await;
        f(&guard)
    }

    /// Applies `f` under the write lock, then saves the snapshot before
    /// the lock is released.
    ///
    /// A mutation and its persistence form one atomic step with respect
    /// to every other task going through this handle.
    ///
    /// # Errors
    /// Returns the store error when the save fails; the in-memory change
    /// has been applied at that point.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut AssistantState) -> R) -> Result<R> {
        let mut guard = self.state.write().await;
        let value = f(&mut guard);
        let snapshot = guard.snapshot();
        self.store.save(&snapshot).await?;
        Ok(value)
    }
}
