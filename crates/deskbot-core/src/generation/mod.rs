//! Answer generation domain module.
//!
//! # Module Structure
//!
//! - `model`: Answer models (`Answer`, `AnswerKind`, `ClarificationRequest`,
//!   `ClarificationContext`)
//! - `service`: Generator trait (`AnswerGenerator`)

mod model;
mod service;

// Re-export public API
pub use model::{Answer, AnswerKind, ClarificationContext, ClarificationRequest};
pub use service::AnswerGenerator;
