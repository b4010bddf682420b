//! Configuration loading.
//!
//! Reads `config.toml` from the base directory; a missing file is
//! replaced with the serialized defaults so users have something to
//! edit.

use deskbot_core::config::AppConfig;
use deskbot_core::error::{DeskbotError, Result};
use std::path::Path;
use tokio::fs;

/// Loads the configuration, writing the defaults first if the file is
/// missing.
///
/// # Arguments
///
/// * `path` - Path of the config file (usually `~/.deskbot/config.toml`)
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed,
/// or when the default file cannot be written.
pub async fn load_or_init(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        let config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&config)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                DeskbotError::io(format!("Failed to create config directory: {}", e))
            })?;
        }
        fs::write(path, toml_string).await.map_err(|e| {
            DeskbotError::io(format!("Failed to write default config {:?}: {}", path, e))
        })?;

        tracing::info!(target: "config", path = ?path, "wrote default configuration");
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| DeskbotError::io(format!("Failed to read config {:?}: {}", path, e)))?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}
