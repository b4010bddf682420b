//! Answer generator trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::{Answer, ClarificationContext};

/// Service that turns a support question into a structured answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generates an answer for the given query.
    ///
    /// # Arguments
    /// * `query` - The user's question text
    /// * `context` - Clarification context when re-issuing a query after
    ///   the user picked clarification options; `None` for a first ask
    ///
    /// # Returns
    /// The generated answer. Implementations may set `clarification` on
    /// the answer to request user input; callers decide whether to honor
    /// it (a contextful ask is always treated as final).
    async fn ask(&self, query: &str, context: Option<&ClarificationContext>) -> Result<Answer>;
}
