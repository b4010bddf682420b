//! CLI command implementations.

pub mod chat;
pub mod events;
pub mod queue;
pub mod status;

mod context;

pub use context::AppContext;
