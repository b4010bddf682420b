//! Answer feedback model.
//!
//! Feedback is write-only analytics: it is validated, recorded as an
//! event, and never attached to conversation messages.

use crate::error::{DeskbotError, Result};
use serde::{Deserialize, Serialize};

/// Maximum accepted feedback comment length, in characters.
pub const COMMENT_MAX_CHARS: usize = 200;

/// A user's verdict on a generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Id of the answer being rated
    pub answer_id: String,
    /// Thumbs up / thumbs down
    pub helpful: bool,
    /// Optional free-text comment, at most [`COMMENT_MAX_CHARS`] chars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Feedback {
    /// Creates validated feedback.
    ///
    /// # Errors
    /// Returns `InvalidInput` when the comment exceeds
    /// [`COMMENT_MAX_CHARS`] characters.
    pub fn new(
        answer_id: impl Into<String>,
        helpful: bool,
        comment: Option<String>,
    ) -> Result<Self> {
        if let Some(ref text) = comment {
            let chars = text.chars().count();
            if chars > COMMENT_MAX_CHARS {
                return Err(DeskbotError::invalid_input(format!(
                    "feedback comment is {} chars, limit is {}",
                    chars, COMMENT_MAX_CHARS
                )));
            }
        }
        Ok(Self {
            answer_id: answer_id.into(),
            helpful,
            comment: comment.filter(|c| !c.is_empty()),
        })
    }
}
