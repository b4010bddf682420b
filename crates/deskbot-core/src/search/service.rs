//! Source retrieval trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{SearchFilters, Source};

/// Service that retrieves knowledge sources relevant to a query.
#[async_trait]
pub trait SourceRetriever: Send + Sync {
    /// Retrieves sources matching the query.
    ///
    /// # Arguments
    /// * `query` - The search query string
    /// * `filters` - Role and optional space restriction
    ///
    /// # Returns
    /// Matched sources with per-document accessibility already resolved
    /// for the requesting role.
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Source>>;
}
