//! Assistant state container and its persisted snapshot.
//!
//! `AssistantState` is the single in-memory state tree the use cases
//! operate on. A selected subset of it is persisted as one JSON blob
//! (`PersistedState`); everything else (clarification flow, retrieved
//! sources, the session epoch) is volatile and rebuilt empty on startup.

use crate::clarification::ClarificationFlow;
use crate::escalation::EscalationQueue;
use crate::event::{EventKind, EventLog, LogEvent};
use crate::search::Source;
use crate::session::{Environment, Message, MessageBody, Session, UserRole};
use serde::{Deserialize, Serialize};

/// Default display name for an unidentified user.
pub const DEFAULT_USER: &str = "User";

/// The full in-memory application state.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantState {
    /// Display name of the current user
    pub current_user: String,
    /// Role of the current user
    pub user_role: UserRole,
    /// Currently selected environment
    pub environment: Environment,
    /// The active conversation session, if one was started
    pub session: Option<Session>,
    /// Sources retrieved for the most recent query (volatile)
    pub current_sources: Vec<Source>,
    /// Clarification ask-back state (volatile)
    pub clarification: ClarificationFlow,
    /// Escalations awaiting resubmission
    pub escalation_queue: EscalationQueue,
    /// Bounded analytics event log
    pub events: EventLog,
    /// Monotonic counter bumped whenever the conversation context is
    /// replaced; in-flight completions captured under an older value
    /// must be discarded (volatile)
    pub session_epoch: u64,
}

impl Default for AssistantState {
    fn default() -> Self {
        Self {
            current_user: DEFAULT_USER.to_string(),
            user_role: UserRole::default(),
            environment: Environment::default(),
            session: None,
            current_sources: Vec::new(),
            clarification: ClarificationFlow::default(),
            escalation_queue: EscalationQueue::default(),
            events: EventLog::new(),
            session_epoch: 0,
        }
    }
}

impl AssistantState {
    /// Starts a fresh session and adopts its identity at the top level.
    ///
    /// Bumps the session epoch so completions started against a previous
    /// session are discarded.
    pub fn init_session(
        &mut self,
        user: impl Into<String>,
        role: UserRole,
        environment: Environment,
    ) -> &Session {
        let user = user.into();
        self.current_user = user.clone();
        self.user_role = role;
        self.environment = environment;
        self.current_sources.clear();
        self.clarification.finish();
        self.session_epoch += 1;
        self.session.insert(Session::new(user, role, environment))
    }

    /// Appends a message to the active session.
    ///
    /// Callers must only append while a session is active; without one
    /// this is a silent no-op and returns `None` (precondition violation,
    /// not a runtime error).
    pub fn append_message(&mut self, body: MessageBody) -> Option<Message> {
        match self.session.as_mut() {
            Some(session) => Some(session.append(body).clone()),
            None => None,
        }
    }

    /// Empties the conversation while keeping the session identity.
    ///
    /// Messages and retrieved sources are dropped, the clarification flow
    /// is reset, and the epoch is bumped; user, role, environment, and
    /// the session's id/creation time survive.
    pub fn clear_history(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear_messages();
        }
        self.current_sources.clear();
        self.clarification.finish();
        self.session_epoch += 1;
    }

    /// Replaces the retrieved-sources slot with this query's results.
    pub fn set_sources(&mut self, sources: Vec<Source>) {
        self.current_sources = sources;
    }

    /// Switches the application-level environment.
    ///
    /// An active session keeps the environment it was created with.
    pub fn switch_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// Records an analytics event stamped with the current origin.
    pub fn record_event(&mut self, kind: EventKind, data: serde_json::Value) -> LogEvent {
        let session_id = self.session.as_ref().map(|s| s.session_id.as_str());
        self.events
            .record(kind, data, session_id, &self.current_user)
            .clone()
    }

    /// The persisted subset of this state.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            current_user: self.current_user.clone(),
            user_role: self.user_role,
            environment: self.environment,
            session: self.session.clone(),
            escalation_queue: self.escalation_queue.clone(),
            events: self.events.persisted_tail(),
        }
    }

    /// Rebuilds state from a persisted blob; volatile parts start empty.
    pub fn hydrate(persisted: PersistedState) -> Self {
        Self {
            current_user: persisted.current_user,
            user_role: persisted.user_role,
            environment: persisted.environment,
            session: persisted.session,
            current_sources: Vec::new(),
            clarification: ClarificationFlow::default(),
            escalation_queue: persisted.escalation_queue,
            events: EventLog::from_events(persisted.events),
            session_epoch: 0,
        }
    }
}

/// The JSON blob written by the state store.
///
/// Contains exactly the fields worth keeping across restarts; the
/// clarification flow and the retrieved-sources cache are deliberately
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub current_user: String,
    #[serde(default)]
    pub user_role: UserRole,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub escalation_queue: EscalationQueue,
    /// Last events, capped at the persisted limit
    #[serde(default)]
    pub events: Vec<LogEvent>,
}
