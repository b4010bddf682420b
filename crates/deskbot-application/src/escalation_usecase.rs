//! Escalation submission and retry-queue draining.

use crate::shared_state::SharedState;
use chrono::{DateTime, Utc};
use deskbot_core::error::{DeskbotError, Result};
use deskbot_core::escalation::{EscalationDraft, EscalationDraftInput, TicketSubmitter};
use deskbot_core::event::EventKind;
use serde_json::json;
use std::sync::Arc;

/// What a drain pass achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct DrainReport {
    /// Drafts submitted during this pass, in queue order.
    pub submitted: Vec<EscalationDraft>,
    /// Drafts still queued after the pass.
    pub remaining: usize,
}

/// Files escalations with the ticket tracker, queueing failures for a
/// later retry.
#[derive(Clone)]
pub struct EscalationUseCase {
    state: SharedState,
    ticket_agent: Arc<dyn TicketSubmitter>,
}

impl EscalationUseCase {
    pub fn new(state: SharedState, ticket_agent: Arc<dyn TicketSubmitter>) -> Self {
        Self {
            state,
            ticket_agent,
        }
    }

    /// Builds a draft from the conversation around the given answer.
    pub async fn prefill(&self, answer_id: &str) -> Result<EscalationDraftInput> {
        self.state
            .read(|st| {
                let session = st.session.as_ref();
                let answer = session
                    .and_then(|s| s.answer_by_id(answer_id))
                    .ok_or_else(|| DeskbotError::not_found("answer", answer_id.to_string()))?;
                let query = session.and_then(|s| s.last_user_text());
                Ok(EscalationDraftInput::prefill(query, Some(answer)))
            })
            .await
    }

    /// Submits a draft, or queues it when the tracker is unavailable.
    ///
    /// Exactly one of the two happens per call. Validation failures do
    /// neither: they never reach the tracker or the queue.
    pub async fn submit(
        &self,
        input: EscalationDraftInput,
        answer_id: Option<&str>,
    ) -> Result<EscalationDraft> {
        input.validate()?;

        match self.ticket_agent.create_draft(&input).await {
            Ok(draft) => {
                let payload = creation_payload(&draft, answer_id);
                self.state
                    .mutate(|st| {
                        st.record_event(EventKind::EscalationCreated, payload);
                    })
                    .await?;
                tracing::info!(
                    target: "escalation",
                    draft_id = %draft.draft_id,
                    link = %draft.link,
                    "escalation draft created"
                );
                Ok(draft)
            }
            Err(error) => {
                tracing::warn!(target: "escalation", %error, "submission failed, queueing draft");
                self.state
                    .mutate(|st| st.escalation_queue.push_failed(input))
                    .await?;
                Err(error)
            }
        }
    }

    /// Retries queued drafts oldest first, stopping at the first failure.
    pub async fn drain(&self) -> Result<DrainReport> {
        let mut submitted = Vec::new();
        loop {
            let Some(input) = self
                .state
                .read(|st| st.escalation_queue.front().cloned())
                .await
            else {
                break;
            };

            match self.ticket_agent.create_draft(&input).await {
                Ok(draft) => {
                    let payload = creation_payload(&draft, None);
                    self.state
                        .mutate(|st| {
                            st.escalation_queue.pop_front();
                            st.record_event(EventKind::EscalationCreated, payload);
                        })
                        .await?;
                    tracing::info!(
                        target: "escalation",
                        draft_id = %draft.draft_id,
                        "queued escalation submitted"
                    );
                    submitted.push(draft);
                }
                Err(error) => {
                    tracing::warn!(target: "escalation", %error, "retry failed, keeping the rest queued");
                    self.state
                        .mutate(|st| st.escalation_queue.mark_attempt())
                        .await?;
                    break;
                }
            }
        }

        let remaining = self.state.read(|st| st.escalation_queue.len()).await;
        Ok(DrainReport {
            submitted,
            remaining,
        })
    }

    /// The queued drafts and the time of the last submission attempt.
    pub async fn queue(&self) -> (Vec<EscalationDraftInput>, Option<DateTime<Utc>>) {
        self.state
            .read(|st| {
                (
                    st.escalation_queue.items.clone(),
                    st.escalation_queue.last_attempt,
                )
            })
            .await
    }
}

fn creation_payload(draft: &EscalationDraft, answer_id: Option<&str>) -> serde_json::Value {
    json!({
        "draft_id": draft.draft_id,
        "answer_id": answer_id,
        "project": draft.project,
        "priority": draft.priority.to_string(),
    })
}
