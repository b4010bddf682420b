//! Deskbot Application - use case layer.
//!
//! Wires the domain model to the collaborator agents and the state
//! store. Each use case owns one concern: `ChatUseCase` runs query
//! round-trips and the clarification loop, `EscalationUseCase` files
//! tickets, and `SessionUseCase` manages the conversation lifecycle.

pub mod chat_usecase;
pub mod escalation_usecase;
pub mod session_usecase;
pub mod shared_state;

// Re-export public API
pub use chat_usecase::{ChatUseCase, QueryOutcome};
pub use escalation_usecase::{DrainReport, EscalationUseCase};
pub use session_usecase::SessionUseCase;
pub use shared_state::SharedState;
