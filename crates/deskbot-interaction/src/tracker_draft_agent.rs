//! TrackerDraftAgent - issue tracker draft creation.
//!
//! Simulates the ticket tracker backend: drafts are acknowledged with
//! a generated id and a draft link, and availability can be toggled to
//! exercise the offline queueing path.

use async_trait::async_trait;
use deskbot_core::error::{DeskbotError, Result};
use deskbot_core::escalation::{EscalationDraft, EscalationDraftInput, TicketSubmitter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const SUBMIT_LATENCY_MS: u64 = 500;

/// Agent that turns escalation input into tracker drafts.
#[derive(Clone)]
pub struct TrackerDraftAgent {
    available: Arc<AtomicBool>,
    simulate_latency: bool,
}

impl Default for TrackerDraftAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerDraftAgent {
    /// Creates an available agent with latency simulation enabled.
    pub fn new() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            simulate_latency: true,
        }
    }

    /// Sets the initial availability of the tracker backend.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Enables or disables the simulated submission delay.
    pub fn with_latency(mut self, enabled: bool) -> Self {
        self.simulate_latency = enabled;
        self
    }

    /// Toggles availability at runtime. Clones share the flag.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl TicketSubmitter for TrackerDraftAgent {
    async fn create_draft(&self, input: &EscalationDraftInput) -> Result<EscalationDraft> {
        if self.simulate_latency {
            tokio::time::sleep(Duration::from_millis(SUBMIT_LATENCY_MS)).await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(DeskbotError::collaborator(
                "Ticket tracker is temporarily unavailable",
            ));
        }

        let draft_id = Uuid::new_v4().to_string();
        let link = format!("jira://draft/{}", draft_id);
        tracing::info!(target: "tracker_agent", draft_id = %draft_id, "draft created");

        Ok(EscalationDraft {
            draft_id,
            project: input.project.clone(),
            issue_type: input.issue_type.clone(),
            priority: input.priority,
            components: input.components.clone(),
            summary: input.summary.clone(),
            description: input.description.clone(),
            link,
        })
    }
}
