//! Ticket submitter trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::escalation::{EscalationDraft, EscalationDraftInput};

/// Service that files escalation drafts with the ticket tracker.
#[async_trait]
pub trait TicketSubmitter: Send + Sync {
    /// Creates a ticket draft from the given input.
    ///
    /// # Arguments
    /// * `input` - Draft fields; the submitter echoes them back with a
    ///   tracker-assigned id and link
    ///
    /// # Errors
    /// Returns `Collaborator` when the tracker is unavailable; callers
    /// queue the unmodified input for a later retry in that case.
    async fn create_draft(&self, input: &EscalationDraftInput) -> Result<EscalationDraft>;
}
