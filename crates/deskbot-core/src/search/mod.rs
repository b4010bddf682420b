//! Knowledge retrieval domain module.
//!
//! # Module Structure
//!
//! - `model`: Source models (`Source`, `SearchFilters`)
//! - `service`: Retrieval trait (`SourceRetriever`)
//! - `status`: Index freshness (`IndexStatus`, `SpaceStatus`, `IndexStatusProvider`)

mod model;
mod service;
mod status;

// Re-export public API
pub use model::{SearchFilters, Source};
pub use service::SourceRetriever;
pub use status::{IndexStatus, IndexStatusProvider, SpaceStatus};
