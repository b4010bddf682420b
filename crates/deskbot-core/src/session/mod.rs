//! Session domain module.
//!
//! This module contains the conversation session model and its message
//! types.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `UserRole`, `Environment`)
//! - `message`: Conversation message types (`Message`, `MessageBody`)
//!
//! # Usage
//!
//! ```ignore
//! use deskbot_core::session::{Session, UserRole, Environment};
//! use deskbot_core::session::{Message, MessageBody};
//! ```

mod message;
mod model;

// Re-export public API
pub use message::{Message, MessageBody};
pub use model::{Environment, MESSAGE_HISTORY_CAP, Session, UserRole};
