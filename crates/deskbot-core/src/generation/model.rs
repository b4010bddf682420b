//! Answer generation domain models.

use crate::search::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Presentation format of a generated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Unordered checks to run through
    Checklist,
    /// Ordered resolution steps
    Steps,
    /// Short free-form reply
    Brief,
}

/// A generated answer to a support question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Unique answer identifier (UUID format)
    pub answer_id: String,

    /// Presentation format
    #[serde(rename = "type")]
    pub kind: AnswerKind,

    /// Resolution steps, typically 3-5 entries
    pub steps: Vec<String>,

    /// Knowledge sources the answer was built from
    pub sources: Vec<Source>,

    /// Generator confidence in the 0.0..=1.0 range
    pub confidence: f64,

    /// Simulated generation latency
    pub latency_ms: u64,

    /// Present when the generator wants the user to narrow the question
    /// down before it commits to a full answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification: Option<ClarificationRequest>,
}

impl Answer {
    /// Whether the generator asked for clarification instead of (or on
    /// top of) a full answer.
    pub fn needs_clarification(&self) -> bool {
        self.clarification.is_some()
    }
}

/// A generator's request to narrow the question down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationRequest {
    /// Option labels the user can pick values for
    pub options: Vec<String>,
}

/// Context passed back to the generator when re-issuing a query after
/// the user answered clarification questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationContext {
    /// The query text the clarification round started from
    pub original_query: String,

    /// Option label -> chosen value, in stable order
    pub selected_options: BTreeMap<String, String>,

    /// How many more selections the flow would still accept before
    /// auto re-querying
    pub remaining_questions: u32,
}
