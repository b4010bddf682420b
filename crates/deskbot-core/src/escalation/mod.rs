//! Escalation domain module.
//!
//! # Module Structure
//!
//! - `model`: Draft models and retry queue (`EscalationDraftInput`,
//!   `EscalationDraft`, `EscalationQueue`, `EscalationPriority`)
//! - `service`: Submission trait (`TicketSubmitter`)

mod model;
mod service;

// Re-export public API
pub use model::{
    DEFAULT_COMPONENT, DEFAULT_ISSUE_TYPE, DEFAULT_PROJECT, DESCRIPTION_MAX_CHARS,
    EscalationDraft, EscalationDraftInput, EscalationPriority, EscalationQueue,
    SUMMARY_MAX_CHARS,
};
pub use service::TicketSubmitter;
