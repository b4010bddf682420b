//! State store trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::model::PersistedState;

/// Storage for the persisted state blob.
///
/// # Implementation Notes
///
/// The whole blob is written on every save; there is no partial update.
/// Implementations should make the write atomic so a crash never leaves
/// a half-written file behind.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the persisted blob.
    ///
    /// # Returns
    /// - `Ok(Some(PersistedState))`: a blob was found and parsed
    /// - `Ok(None)`: nothing persisted yet; callers fall back to defaults
    /// - `Err`: the blob exists but could not be read or parsed
    async fn load(&self) -> Result<Option<PersistedState>>;

    /// Writes the blob, replacing any previous one.
    async fn save(&self, state: &PersistedState) -> Result<()>;
}
