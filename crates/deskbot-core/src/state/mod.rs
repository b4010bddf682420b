//! Application state module.
//!
//! # Module Structure
//!
//! - `model`: State container and persisted blob (`AssistantState`,
//!   `PersistedState`)
//! - `repository`: Storage trait (`StateStore`)

mod model;
mod repository;

// Re-export public API
pub use model::{AssistantState, DEFAULT_USER, PersistedState};
pub use repository::StateStore;
