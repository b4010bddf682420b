pub mod clarification;
pub mod config;
pub mod error;
pub mod escalation;
pub mod event;
pub mod feedback;
pub mod generation;
pub mod search;
pub mod session;
pub mod state;

// Re-export common error type
pub use error::{DeskbotError, Result};
