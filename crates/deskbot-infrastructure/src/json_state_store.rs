//! File-backed state store.
//!
//! Persists the state blob as pretty-printed JSON under the base
//! directory. Writes go through a temp file and an atomic rename so a
//! crash mid-write never corrupts the previous blob.

use async_trait::async_trait;
use deskbot_core::error::{DeskbotError, Result};
use deskbot_core::state::{PersistedState, StateStore};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::paths;

/// Manages state persistence to the filesystem.
pub struct JsonFileStateStore {
    base_dir: PathBuf,
}

impl JsonFileStateStore {
    /// Creates a store rooted at the specified base directory.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - The base directory for storing state
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir).await.map_err(|e| {
            DeskbotError::io(format!(
                "Failed to create state directory {:?}: {}",
                base_dir, e
            ))
        })?;

        Ok(Self { base_dir })
    }

    /// Creates a store at the default location (`~/.deskbot`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or if
    /// the directory cannot be created.
    pub async fn default_location() -> Result<Self> {
        Self::new(paths::default_base_dir()?).await
    }

    /// Returns the base directory this store is rooted at.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the path of the state file.
    pub fn state_file(&self) -> PathBuf {
        paths::state_file(&self.base_dir)
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self) -> Result<Option<PersistedState>> {
        let file_path = self.state_file();

        if !file_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&file_path).await.map_err(|e| {
            DeskbotError::data_access(format!("Failed to read state file {:?}: {}", file_path, e))
        })?;

        if json.trim().is_empty() {
            return Ok(None);
        }

        let state: PersistedState = serde_json::from_str(&json)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        let file_path = self.state_file();
        let json = serde_json::to_string_pretty(state)?;

        // Write to a temp file in the same directory, then rename over
        // the previous blob.
        let tmp_path = self.base_dir.join(format!(".{}.tmp", paths::STATE_FILE_NAME));
        let mut tmp_file = fs::File::create(&tmp_path).await.map_err(|e| {
            DeskbotError::data_access(format!("Failed to create temp file {:?}: {}", tmp_path, e))
        })?;
        tmp_file.write_all(json.as_bytes()).await.map_err(|e| {
            DeskbotError::data_access(format!("Failed to write state file: {}", e))
        })?;
        tmp_file.sync_all().await.map_err(|e| {
            DeskbotError::data_access(format!("Failed to flush state file: {}", e))
        })?;
        drop(tmp_file);

        fs::rename(&tmp_path, &file_path).await.map_err(|e| {
            DeskbotError::data_access(format!(
                "Failed to replace state file {:?}: {}",
                file_path, e
            ))
        })?;

        tracing::debug!(target: "state_store", path = ?file_path, "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskbot_core::session::{Environment, MessageBody, UserRole};
    use deskbot_core::state::AssistantState;
    use tempfile::TempDir;

    fn sample_state() -> PersistedState {
        let mut state = AssistantState::default();
        state.init_session("alice", UserRole::User, Environment::Dev);
        state.append_message(MessageBody::User {
            content: "vpn keeps dropping".to_string(),
        });
        state.snapshot()
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(temp_dir.path()).await.unwrap();
        let state = sample_state();

        store.save(&state).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(temp_dir.path()).await.unwrap();

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(temp_dir.path()).await.unwrap();

        let first = sample_state();
        store.save(&first).await.unwrap();

        let mut second = AssistantState::hydrate(first.clone());
        second.init_session("bob", UserRole::Admin, Environment::Prod);
        store.save(&second.snapshot()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.current_user, "bob");

        // No temp file left behind after the rename.
        let tmp_path = temp_dir.path().join(".state.json.tmp");
        assert!(!tmp_path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(temp_dir.path()).await.unwrap();

        std::fs::write(store.state_file(), "{ not json").unwrap();
        let err = store.load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
