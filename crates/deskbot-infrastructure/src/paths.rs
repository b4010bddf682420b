//! Filesystem locations for Deskbot data.
//!
//! Everything lives under a single base directory (default `~/.deskbot`):
//!
//! ```text
//! ~/.deskbot/
//! ├── state.json    persisted application state
//! └── config.toml   startup configuration
//! ```

use deskbot_core::error::{DeskbotError, Result};
use std::path::{Path, PathBuf};

/// Name of the directory under the home directory.
const BASE_DIR_NAME: &str = ".deskbot";

/// File name of the persisted state blob.
pub const STATE_FILE_NAME: &str = "state.json";

/// File name of the startup configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves the default base directory (`~/.deskbot`).
///
/// # Errors
///
/// Returns a `Config` error when the home directory cannot be determined.
pub fn default_base_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| DeskbotError::config("Failed to get home directory"))?;
    Ok(home_dir.join(BASE_DIR_NAME))
}

/// Path of the state blob inside `base_dir`.
pub fn state_file(base_dir: impl AsRef<Path>) -> PathBuf {
    base_dir.as_ref().join(STATE_FILE_NAME)
}

/// Path of the config file inside `base_dir`.
pub fn config_file(base_dir: impl AsRef<Path>) -> PathBuf {
    base_dir.as_ref().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_joined_to_base() {
        let base = PathBuf::from("/tmp/deskbot-test");
        assert_eq!(state_file(&base), base.join("state.json"));
        assert_eq!(config_file(&base), base.join("config.toml"));
    }
}
