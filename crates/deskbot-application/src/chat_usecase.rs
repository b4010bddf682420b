//! Chat query orchestration.
//!
//! `ChatUseCase` drives one query round-trip: append the user message,
//! call the answer generator and the source retriever concurrently, then
//! apply the joined result to the conversation. It also runs the
//! clarification loop (open on an ask-back, auto re-query once enough
//! options are selected) and guards against overlapping round-trips with
//! an advisory in-flight flag.

use crate::shared_state::SharedState;
use deskbot_core::clarification::SelectionOutcome;
use deskbot_core::error::Result;
use deskbot_core::event::EventKind;
use deskbot_core::feedback::Feedback;
use deskbot_core::generation::{Answer, AnswerGenerator};
use deskbot_core::search::{SearchFilters, Source, SourceRetriever};
use deskbot_core::session::{Message, MessageBody};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bot prompt shown when the generator asks the user to narrow down.
pub const CLARIFICATION_PROMPT: &str =
    "To give you a more precise answer, pick the clarification options that apply.";

/// Bot prompt preceding a final answer.
pub const SOLUTION_PROMPT: &str = "Here is a step-by-step solution for your problem:";

/// System notice appended when a collaborator call fails.
pub const GENERATION_ERROR_NOTICE: &str =
    "Something went wrong while preparing an answer. Try rephrasing the question or contact an administrator.";

/// Result of one query round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Another round-trip was in flight; nothing happened.
    Busy,
    /// A terminal answer was appended.
    Answer(Message),
    /// The generator asked back; the clarification flow is now open.
    Clarification(Message),
    /// A collaborator failed; an error notice was appended.
    Failure(Message),
    /// The conversation was replaced while the query was in flight; the
    /// completion was dropped without touching anything.
    Discarded,
}

/// Orchestrates query round-trips against the collaborator agents.
#[derive(Clone)]
pub struct ChatUseCase {
    state: SharedState,
    answer_agent: Arc<dyn AnswerGenerator>,
    search_agent: Arc<dyn SourceRetriever>,
    in_flight: Arc<AtomicBool>,
}

impl ChatUseCase {
    pub fn new(
        state: SharedState,
        answer_agent: Arc<dyn AnswerGenerator>,
        search_agent: Arc<dyn SourceRetriever>,
    ) -> Self {
        Self {
            state,
            answer_agent,
            search_agent,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a query round-trip is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one query round-trip.
    ///
    /// Appends the user message, joins the two collaborator calls, and
    /// appends the resulting bot (or error notice) message. Collaborator
    /// failures are absorbed into `QueryOutcome::Failure`; only state
    /// store faults surface as `Err`.
    pub async fn handle_query(&self, text: &str) -> Result<QueryOutcome> {
        self.run_query(text, false).await
    }

    /// Records one clarification selection.
    ///
    /// Selections while the flow is idle, or for options that were never
    /// offered, are silently ignored. Reaching the selection threshold
    /// re-issues the most recent user query automatically and returns
    /// that round-trip's outcome.
    pub async fn select_clarification(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<QueryOutcome>> {
        let eligible = self
            .state
            .read(|st| st.clarification.is_awaiting() && st.clarification.offers(key))
            .await;
        if !eligible {
            return Ok(None);
        }

        let threshold_hit = self
            .state
            .mutate(|st| match st.clarification.select(key, value) {
                SelectionOutcome::Ignored => None,
                SelectionOutcome::Recorded { distinct } => {
                    st.record_event(
                        EventKind::ClarificationSelected,
                        json!({ "key": key, "selected_count": distinct }),
                    );
                    if st.clarification.ready_to_requery() {
                        Some(
                            st.session
                                .as_ref()
                                .and_then(|s| s.last_user_text().map(str::to_string)),
                        )
                    } else {
                        None
                    }
                }
            })
            .await?;

        match threshold_hit {
            Some(Some(query)) => {
                tracing::debug!(target: "chat", "selection threshold reached, re-issuing query");
                // The original user message is already in history; the
                // re-query only appends the resulting bot message.
                Ok(Some(self.run_query(&query, true).await?))
            }
            Some(None) => {
                tracing::warn!(target: "chat", "selection threshold reached with no user message to re-issue");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Records feedback on an answer as a write-only analytics event.
    pub async fn submit_feedback(&self, feedback: Feedback) -> Result<()> {
        let payload = serde_json::to_value(&feedback)?;
        self.state
            .mutate(|st| {
                st.record_event(EventKind::FeedbackSubmitted, payload);
            })
            .await?;
        tracing::debug!(target: "chat", answer_id = %feedback.answer_id, "feedback recorded");
        Ok(())
    }

    async fn run_query(&self, text: &str, is_requery: bool) -> Result<QueryOutcome> {
        // Set synchronously, before the first await point, so a second
        // call can never observe a window between append and resolution.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "chat", "query rejected, another round-trip is in flight");
            return Ok(QueryOutcome::Busy);
        }
        let result = self.run_round_trip(text, is_requery).await;
        // Released on every path, including store faults.
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_round_trip(&self, text: &str, is_requery: bool) -> Result<QueryOutcome> {
        let query = text.trim().to_string();

        let (epoch, context, filters) = self
            .state
            .mutate(|st| {
                let context = st.clarification.context(&query);
                if !is_requery {
                    st.append_message(MessageBody::User {
                        content: query.clone(),
                    });
                }
                (
                    st.session_epoch,
                    context,
                    SearchFilters::for_role(st.user_role),
                )
            })
            .await?;

        tracing::debug!(
            target: "chat",
            requery = is_requery,
            followup = context.is_some(),
            "query round-trip started"
        );

        let (answer_res, sources_res) = tokio::join!(
            self.answer_agent.ask(&query, context.as_ref()),
            self.search_agent.search(&query, &filters)
        );

        match (answer_res, sources_res) {
            (Ok(answer), Ok(sources)) => {
                self.complete_round_trip(&query, epoch, context.is_some(), answer, sources)
                    .await
            }
            (answer_res, sources_res) => {
                if let Err(error) = &answer_res {
                    tracing::warn!(target: "chat", %error, "answer generation failed");
                }
                if let Err(error) = &sources_res {
                    tracing::warn!(target: "chat", %error, "source retrieval failed");
                }
                self.state
                    .mutate(|st| {
                        if st.session_epoch != epoch {
                            return QueryOutcome::Discarded;
                        }
                        // The clarification flow and the sources slot are
                        // left exactly as they were.
                        match st.append_message(MessageBody::System {
                            content: GENERATION_ERROR_NOTICE.to_string(),
                        }) {
                            Some(message) => QueryOutcome::Failure(message),
                            None => QueryOutcome::Discarded,
                        }
                    })
                    .await
            }
        }
    }

    async fn complete_round_trip(
        &self,
        query: &str,
        epoch: u64,
        was_followup: bool,
        answer: Answer,
        sources: Vec<Source>,
    ) -> Result<QueryOutcome> {
        self.state
            .mutate(|st| {
                if st.session_epoch != epoch {
                    tracing::debug!(target: "chat", "discarding completion for a replaced conversation");
                    return QueryOutcome::Discarded;
                }

                let sources_count = sources.len();
                let accessible_sources = sources.iter().filter(|s| s.accessible).count();
                st.set_sources(sources);

                let payload = json!({
                    "query": query,
                    "answer_id": answer.answer_id,
                    "confidence": answer.confidence,
                    "latency_ms": answer.latency_ms,
                    "sources_count": sources_count,
                    "accessible_sources": accessible_sources,
                });

                let outcome = if answer.needs_clarification() && !was_followup {
                    let options = answer
                        .clarification
                        .as_ref()
                        .map(|c| c.options.clone())
                        .unwrap_or_default();
                    st.clarification.begin(options);
                    match st.append_message(MessageBody::Bot {
                        content: CLARIFICATION_PROMPT.to_string(),
                        answer: Some(answer),
                    }) {
                        Some(message) => QueryOutcome::Clarification(message),
                        None => QueryOutcome::Discarded,
                    }
                } else {
                    // A follow-up always terminates the round, even when
                    // the generator asks back again.
                    if st.clarification.is_awaiting() {
                        st.clarification.finish();
                    }
                    match st.append_message(MessageBody::Bot {
                        content: SOLUTION_PROMPT.to_string(),
                        answer: Some(answer),
                    }) {
                        Some(message) => QueryOutcome::Answer(message),
                        None => QueryOutcome::Discarded,
                    }
                };

                if !matches!(outcome, QueryOutcome::Discarded) {
                    st.record_event(EventKind::AnswerGenerated, payload);
                }
                outcome
            })
            .await
    }
}
