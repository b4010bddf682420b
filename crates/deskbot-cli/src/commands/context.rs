//! Shared wiring built once at startup.

use anyhow::{Context as _, Result};
use deskbot_application::{ChatUseCase, EscalationUseCase, SessionUseCase, SharedState};
use deskbot_infrastructure::{JsonFileStateStore, config_service, paths};
use deskbot_interaction::{KnowledgeSearchAgent, ScriptedAnswerAgent, TrackerDraftAgent};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs: the use cases plus a direct handle to the
/// search agent, whose index-status surface the CLI exposes.
pub struct AppContext {
    pub chat: ChatUseCase,
    pub escalation: EscalationUseCase,
    pub session: SessionUseCase,
    /// Shares its index with the retriever wired into `chat`.
    pub search_agent: KnowledgeSearchAgent,
}

impl AppContext {
    /// Opens the data directory, hydrates state, and starts (or resumes)
    /// the session.
    pub async fn bootstrap(data_dir: Option<PathBuf>, no_delay: bool) -> Result<Self> {
        let store = match data_dir {
            Some(dir) => JsonFileStateStore::new(&dir)
                .await
                .with_context(|| format!("Failed to prepare data directory {:?}", dir))?,
            None => JsonFileStateStore::default_location()
                .await
                .context("Failed to prepare the default data directory")?,
        };
        let config_path = paths::config_file(store.base_dir());

        let state = SharedState::load_or_default(Arc::new(store))
            .await
            .context("Failed to load persisted state")?;
        let config = config_service::load_or_init(&config_path)
            .await
            .context("Failed to load configuration")?;

        let simulate_latency = !no_delay;
        let answer_agent = ScriptedAnswerAgent::new().with_latency(simulate_latency);
        let search_agent = KnowledgeSearchAgent::new().with_latency(simulate_latency);
        let tracker_agent = TrackerDraftAgent::new().with_latency(simulate_latency);

        let chat = ChatUseCase::new(
            state.clone(),
            Arc::new(answer_agent),
            Arc::new(search_agent.clone()),
        );
        let escalation = EscalationUseCase::new(state.clone(), Arc::new(tracker_agent));
        let session = SessionUseCase::new(state);

        session
            .start_from_config(&config)
            .await
            .context("Failed to start the session")?;

        Ok(Self {
            chat,
            escalation,
            session,
            search_agent,
        })
    }
}
