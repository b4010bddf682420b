//! Session lifecycle and conversation inspection.

use crate::shared_state::SharedState;
use deskbot_core::config::AppConfig;
use deskbot_core::error::Result;
use deskbot_core::event::LogEvent;
use deskbot_core::search::Source;
use deskbot_core::session::{Environment, Message, MessageBody, Session, UserRole};

/// Manages the conversation session and read access to its surroundings.
#[derive(Clone)]
pub struct SessionUseCase {
    state: SharedState,
}

impl SessionUseCase {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Starts a fresh session, replacing any existing one.
    pub async fn init_session(
        &self,
        user: impl Into<String>,
        role: UserRole,
        environment: Environment,
    ) -> Result<Session> {
        let user = user.into();
        let session = self
            .state
            .mutate(|st| st.init_session(user, role, environment).clone())
            .await?;
        tracing::info!(
            target: "session",
            session_id = %session.session_id,
            user = %session.user,
            role = %session.role,
            environment = %session.environment,
            "session started"
        );
        Ok(session)
    }

    /// Resumes the hydrated session, or starts one from the configured
    /// identity when none survived.
    pub async fn start_from_config(&self, config: &AppConfig) -> Result<Session> {
        let session = self
            .state
            .mutate(|st| match st.session.clone() {
                Some(existing) => existing,
                None => st
                    .init_session(config.user.clone(), config.role, config.environment)
                    .clone(),
            })
            .await?;
        tracing::info!(
            target: "session",
            session_id = %session.session_id,
            messages = session.messages.len(),
            "session ready"
        );
        Ok(session)
    }

    /// Empties the conversation while keeping the session identity.
    pub async fn clear_history(&self) -> Result<()> {
        self.state.mutate(|st| st.clear_history()).await?;
        tracing::debug!(target: "session", "history cleared");
        Ok(())
    }

    /// Switches the application-level environment. An active session
    /// keeps the environment it was created with.
    pub async fn switch_environment(&self, environment: Environment) -> Result<()> {
        self.state
            .mutate(|st| st.switch_environment(environment))
            .await?;
        tracing::debug!(target: "session", %environment, "environment switched");
        Ok(())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.state.read(|st| st.session.clone()).await
    }

    /// Sources retrieved for the most recent query.
    pub async fn current_sources(&self) -> Vec<Source> {
        self.state.read(|st| st.current_sources.clone()).await
    }

    /// The last `limit` analytics events, oldest first.
    pub async fn recent_events(&self, limit: usize) -> Vec<LogEvent> {
        self.state.read(|st| st.events.recent(limit)).await
    }

    /// Renders the conversation as plain text, or `None` when no session
    /// was started.
    pub async fn transcript(&self) -> Option<String> {
        self.state
            .read(|st| st.session.as_ref().map(render_transcript))
            .await
    }
}

fn render_transcript(session: &Session) -> String {
    session
        .messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn render_message(message: &Message) -> String {
    let stamp = message.timestamp.format("%Y-%m-%d %H:%M:%S");
    match &message.body {
        MessageBody::User { content } => format!("[{}] User: {}", stamp, content),
        MessageBody::System { content } => format!("[{}] System: {}", stamp, content),
        MessageBody::Bot { content, answer } => {
            let mut block = format!("[{}] Bot: {}", stamp, content);
            if let Some(answer) = answer {
                for (i, step) in answer.steps.iter().enumerate() {
                    block.push_str(&format!("\n{}. {}", i + 1, step));
                }
                let accessible: Vec<_> =
                    answer.sources.iter().filter(|s| s.accessible).collect();
                if !accessible.is_empty() {
                    block.push_str("\nSources:");
                    for source in accessible {
                        block.push_str(&format!("\n- {}: {}", source.title, source.url));
                    }
                }
            }
            block
        }
    }
}
