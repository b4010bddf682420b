//! Bounded analytics event log.
//!
//! Events are append-only and capped: the in-memory log keeps the last
//! [`MEMORY_EVENT_CAP`] entries, and only the last [`PERSISTED_EVENT_CAP`]
//! make it into the persisted blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of events kept in memory.
pub const MEMORY_EVENT_CAP: usize = 100;

/// Maximum number of events written to the persisted blob.
pub const PERSISTED_EVENT_CAP: usize = 50;

/// Session id recorded on events emitted while no session is active.
pub const UNKNOWN_SESSION: &str = "unknown";

/// Kind of an analytics event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AnswerGenerated,
    FeedbackSubmitted,
    EscalationCreated,
    ClarificationSelected,
}

/// A single analytics event with its stamped origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Free-form event payload
    pub data: serde_json::Value,
    /// Timestamp assigned when the event was recorded
    pub timestamp: DateTime<Utc>,
    /// Session the event belongs to, or [`UNKNOWN_SESSION`]
    pub session_id: String,
    /// Display name of the user the event was recorded for
    pub user: String,
}

/// Append-only, capped event buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: VecDeque<LogEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a log from previously persisted events.
    pub fn from_events(events: Vec<LogEvent>) -> Self {
        let mut log = Self::new();
        for event in events {
            log.push(event);
        }
        log
    }

    /// Records an event, stamping the timestamp and origin.
    ///
    /// # Arguments
    /// * `kind` - Event kind
    /// * `data` - Free-form payload
    /// * `session_id` - Active session id, or `None` when no session
    ///   exists ([`UNKNOWN_SESSION`] is recorded in that case)
    /// * `user` - Current user display name
    pub fn record(
        &mut self,
        kind: EventKind,
        data: serde_json::Value,
        session_id: Option<&str>,
        user: &str,
    ) -> &LogEvent {
        self.push(LogEvent {
            kind,
            data,
            timestamp: Utc::now(),
            session_id: session_id.unwrap_or(UNKNOWN_SESSION).to_string(),
            user: user.to_string(),
        });
        // Safe to unwrap because we just pushed an element
        self.events.back().unwrap()
    }

    fn push(&mut self, event: LogEvent) {
        self.events.push_back(event);
        while self.events.len() > MEMORY_EVENT_CAP {
            self.events.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates events oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter()
    }

    /// The last `n` events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LogEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// The tail that goes into the persisted blob.
    pub fn persisted_tail(&self) -> Vec<LogEvent> {
        self.recent(PERSISTED_EVENT_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill(log: &mut EventLog, count: usize) {
        for i in 0..count {
            log.record(
                EventKind::AnswerGenerated,
                json!({ "seq": i }),
                Some("session-1"),
                "alice",
            );
        }
    }

    #[test]
    fn test_record_stamps_origin() {
        let mut log = EventLog::new();
        let event = log.record(
            EventKind::FeedbackSubmitted,
            json!({ "helpful": true }),
            None,
            "alice",
        );
        assert_eq!(event.session_id, UNKNOWN_SESSION);
        assert_eq!(event.user, "alice");
        assert_eq!(event.kind, EventKind::FeedbackSubmitted);
    }

    #[test]
    fn test_memory_cap_evicts_oldest() {
        let mut log = EventLog::new();
        fill(&mut log, MEMORY_EVENT_CAP + 20);

        assert_eq!(log.len(), MEMORY_EVENT_CAP);
        let first = log.iter().next().unwrap();
        assert_eq!(first.data["seq"], 20);
    }

    #[test]
    fn test_persisted_tail_is_capped_at_fifty() {
        let mut log = EventLog::new();
        fill(&mut log, 80);

        let tail = log.persisted_tail();
        assert_eq!(tail.len(), PERSISTED_EVENT_CAP);
        assert_eq!(tail[0].data["seq"], 30);
        assert_eq!(tail[PERSISTED_EVENT_CAP - 1].data["seq"], 79);
    }

    #[test]
    fn test_seeding_from_persisted_events_preserves_order() {
        let mut log = EventLog::new();
        fill(&mut log, 10);

        let reloaded = EventLog::from_events(log.persisted_tail());
        assert_eq!(reloaded.len(), 10);
        assert_eq!(reloaded.iter().next().unwrap().data["seq"], 0);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::ClarificationSelected).unwrap();
        assert_eq!(json, "\"clarification_selected\"");
    }
}
