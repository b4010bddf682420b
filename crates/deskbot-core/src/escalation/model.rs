//! Escalation domain models.
//!
//! An escalation hands an unresolved problem to the ticket tracker as a
//! draft. Failed submissions are kept in a retry queue so nothing is lost
//! while the tracker is down.

use crate::error::{DeskbotError, Result};
use crate::generation::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum summary length, in characters.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Default tracker project for support escalations.
pub const DEFAULT_PROJECT: &str = "ITSUP";

/// Default issue type.
pub const DEFAULT_ISSUE_TYPE: &str = "Incident";

/// Default component list.
pub const DEFAULT_COMPONENT: &str = "Support";

/// Summary used when there is no query text to derive one from.
const FALLBACK_SUMMARY: &str = "Technical support assistance required";

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationPriority {
    Low,
    Medium,
    High,
}

impl Default for EscalationPriority {
    fn default() -> Self {
        EscalationPriority::Medium
    }
}

impl std::fmt::Display for EscalationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EscalationPriority::Low => write!(f, "Low"),
            EscalationPriority::Medium => write!(f, "Medium"),
            EscalationPriority::High => write!(f, "High"),
        }
    }
}

/// Fields of a ticket draft before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDraftInput {
    pub project: String,
    pub issue_type: String,
    pub priority: EscalationPriority,
    #[serde(default)]
    pub components: Vec<String>,
    /// One-line problem statement, at most [`SUMMARY_MAX_CHARS`] chars
    pub summary: String,
    /// Markdown problem description, at most [`DESCRIPTION_MAX_CHARS`] chars
    pub description: String,
}

impl EscalationDraftInput {
    /// Prefills a draft from the conversation: the user's query becomes
    /// the summary, and the description collects the query, the bot's
    /// steps, and the accessible source links.
    ///
    /// Both fields are truncated to their caps, so the result always
    /// passes [`validate`](Self::validate).
    pub fn prefill(query: Option<&str>, answer: Option<&Answer>) -> Self {
        let summary = match query {
            Some(text) if !text.trim().is_empty() => truncate_chars(text.trim(), SUMMARY_MAX_CHARS),
            _ => FALLBACK_SUMMARY.to_string(),
        };

        let mut description = String::new();
        description.push_str("**Original user request:**\n");
        description.push_str(query.unwrap_or("(not provided)"));
        description.push_str("\n\n");
        if let Some(answer) = answer {
            if !answer.steps.is_empty() {
                description.push_str("**Bot answer:**\n");
                description.push_str(&answer.steps.join("\n"));
                description.push_str("\n\n");
            }
            let links: Vec<&str> = answer
                .sources
                .iter()
                .filter(|s| s.accessible)
                .map(|s| s.url.as_str())
                .collect();
            if !links.is_empty() {
                description.push_str("**Sources used:**\n");
                for link in links {
                    description.push_str("- ");
                    description.push_str(link);
                    description.push('\n');
                }
                description.push('\n');
            }
        }
        description.push_str(
            "**Additional information:**\nPlease provide a solution or point out additional diagnostic steps.",
        );

        Self {
            project: DEFAULT_PROJECT.to_string(),
            issue_type: DEFAULT_ISSUE_TYPE.to_string(),
            priority: EscalationPriority::default(),
            components: vec![DEFAULT_COMPONENT.to_string()],
            summary,
            description: truncate_chars(&description, DESCRIPTION_MAX_CHARS),
        }
    }

    /// Checks the length caps.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let summary_chars = self.summary.chars().count();
        if summary_chars > SUMMARY_MAX_CHARS {
            return Err(DeskbotError::invalid_input(format!(
                "summary is {} chars, limit is {}",
                summary_chars, SUMMARY_MAX_CHARS
            )));
        }
        let description_chars = self.description.chars().count();
        if description_chars > DESCRIPTION_MAX_CHARS {
            return Err(DeskbotError::invalid_input(format!(
                "description is {} chars, limit is {}",
                description_chars, DESCRIPTION_MAX_CHARS
            )));
        }
        Ok(())
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// A draft accepted by the ticket tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDraft {
    /// Tracker-assigned draft identifier
    pub draft_id: String,
    pub project: String,
    pub issue_type: String,
    pub priority: EscalationPriority,
    #[serde(default)]
    pub components: Vec<String>,
    pub summary: String,
    pub description: String,
    /// Deep link to the draft in the tracker
    pub link: String,
}

/// Retry queue for escalations that could not be submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscalationQueue {
    /// Failed drafts, oldest first
    #[serde(default)]
    pub items: Vec<EscalationDraftInput>,
    /// When a submission (direct or retry) last ran
    #[serde(default)]
    pub last_attempt: Option<DateTime<Utc>>,
}

impl EscalationQueue {
    /// Appends a failed draft unmodified and stamps the attempt time.
    pub fn push_failed(&mut self, item: EscalationDraftInput) {
        self.items.push(item);
        self.mark_attempt();
    }

    /// Records that a submission attempt just happened.
    pub fn mark_attempt(&mut self) {
        self.last_attempt = Some(Utc::now());
    }

    pub fn front(&self) -> Option<&EscalationDraftInput> {
        self.items.first()
    }

    /// Removes and returns the oldest queued draft.
    pub fn pop_front(&mut self) -> Option<EscalationDraftInput> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::AnswerKind;
    use crate::search::Source;

    fn answer_with_sources() -> Answer {
        Answer {
            answer_id: "a-1".to_string(),
            kind: AnswerKind::Steps,
            steps: vec!["Restart the client".to_string(), "Check the logs".to_string()],
            sources: vec![
                Source {
                    title: "VPN diagnostics".to_string(),
                    space: "ITKB".to_string(),
                    url: "https://kb.example.com/vpn-diagnostics".to_string(),
                    anchor: None,
                    snippet: String::new(),
                    updated_at: Utc::now(),
                    accessible: true,
                },
                Source {
                    title: "Internal runbook".to_string(),
                    space: "MON".to_string(),
                    url: "https://kb.example.com/private".to_string(),
                    anchor: None,
                    snippet: String::new(),
                    updated_at: Utc::now(),
                    accessible: false,
                },
            ],
            confidence: 0.62,
            latency_ms: 900,
            clarification: None,
        }
    }

    #[test]
    fn test_prefill_collects_query_steps_and_accessible_links() {
        let answer = answer_with_sources();
        let input = EscalationDraftInput::prefill(Some("vpn keeps dropping"), Some(&answer));

        assert_eq!(input.project, DEFAULT_PROJECT);
        assert_eq!(input.summary, "vpn keeps dropping");
        assert!(input.description.contains("**Original user request:**"));
        assert!(input.description.contains("Restart the client"));
        assert!(input.description.contains("vpn-diagnostics"));
        // Inaccessible sources never leak into ticket text.
        assert!(!input.description.contains("private"));
        input.validate().unwrap();
    }

    #[test]
    fn test_prefill_without_query_uses_fallback_summary() {
        let input = EscalationDraftInput::prefill(None, None);
        assert_eq!(input.summary, FALLBACK_SUMMARY);
        input.validate().unwrap();
    }

    #[test]
    fn test_prefill_truncates_to_caps() {
        let long_query = "q".repeat(SUMMARY_MAX_CHARS * 3);
        let input = EscalationDraftInput::prefill(Some(&long_query), None);
        assert_eq!(input.summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(input.description.chars().count() <= DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_validate_rejects_oversized_summary() {
        let mut input = EscalationDraftInput::prefill(Some("short"), None);
        input.summary = "s".repeat(SUMMARY_MAX_CHARS + 1);
        assert!(input.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_push_failed_appends_unmodified_and_stamps() {
        let mut queue = EscalationQueue::default();
        assert!(queue.last_attempt.is_none());

        let input = EscalationDraftInput::prefill(Some("printer jam"), None);
        queue.push_failed(input.clone());

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.front(), Some(&input));
        assert!(queue.last_attempt.is_some());
    }
}
