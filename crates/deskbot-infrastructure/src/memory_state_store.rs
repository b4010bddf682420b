//! In-memory state store.
//!
//! Used by tests and by ephemeral runs that shouldn't touch the
//! filesystem.

use async_trait::async_trait;
use deskbot_core::error::Result;
use deskbot_core::state::{PersistedState, StateStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A state store that keeps the blob in memory.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    state: Arc<Mutex<Option<PersistedState>>>,
    save_count: Arc<Mutex<usize>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently saved blob, if any.
    pub async fn saved(&self) -> Option<PersistedState> {
        self.state.lock().await.clone()
    }

    /// Number of saves performed, for asserting persistence behavior.
    pub async fn save_count(&self) -> usize {
        *self.save_count.lock().await
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<Option<PersistedState>> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        *self.state.lock().await = Some(state.clone());
        *self.save_count.lock().await += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskbot_core::state::AssistantState;

    #[tokio::test]
    async fn test_round_trip_and_save_count() {
        let store = InMemoryStateStore::new();
        assert!(store.load().await.unwrap().is_none());

        let snapshot = AssistantState::default().snapshot();
        store.save(&snapshot).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(snapshot));
        assert_eq!(store.save_count().await, 1);
    }
}
