//! Search index status models and provider trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Index state of a single knowledge space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceStatus {
    /// Space key (e.g. "ITKB")
    pub key: String,
    /// Human-readable space name
    pub name: String,
    /// Last successful index run for this space
    pub last_updated_at: DateTime<Utc>,
    /// Number of indexed documents
    pub docs: u32,
    /// Number of documents that failed to index
    pub errors: u32,
}

/// Aggregated index state across all spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    pub spaces: Vec<SpaceStatus>,
    /// The oldest per-space update time; the whole index is only as
    /// fresh as its most stale space.
    pub last_global_update_at: DateTime<Utc>,
}

/// Service reporting (and refreshing) the knowledge index.
#[async_trait]
pub trait IndexStatusProvider: Send + Sync {
    /// Returns the current per-space index state.
    async fn status(&self) -> Result<IndexStatus>;

    /// Triggers a re-index of one space.
    ///
    /// # Errors
    /// Returns `NotFound` when `space_key` does not name a known space.
    async fn reindex(&self, space_key: &str) -> Result<()>;
}
