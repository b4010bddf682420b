pub mod config_service;
pub mod json_state_store;
pub mod memory_state_store;
pub mod paths;

pub use crate::json_state_store::JsonFileStateStore;
pub use crate::memory_state_store::InMemoryStateStore;
