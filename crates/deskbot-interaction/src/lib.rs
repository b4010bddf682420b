//! Deskbot Interaction - scripted collaborator agents.
//!
//! Implements the collaborator traits from `deskbot_core` against
//! canned data: answer generation, knowledge base retrieval, and
//! ticket tracker drafts. Latency simulation is on by default and can
//! be switched off for tests.

pub mod knowledge_search_agent;
pub mod scripted_answer_agent;
pub mod tracker_draft_agent;

// Re-export public API
pub use knowledge_search_agent::KnowledgeSearchAgent;
pub use scripted_answer_agent::ScriptedAnswerAgent;
pub use tracker_draft_agent::TrackerDraftAgent;
