//! Session domain model.
//!
//! This module contains the core `Session` entity plus the identity enums
//! (`UserRole`, `Environment`) that a session is created with.

use super::message::{Message, MessageBody};
use crate::generation::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of messages retained in a session history.
///
/// Appending past the cap evicts the oldest messages first.
pub const MESSAGE_HISTORY_CAP: usize = 20;

/// Access level of the current user.
///
/// Controls knowledge-source visibility; restricted spaces are only
/// readable by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Target environment the assistant answers questions about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Dev
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Staging => write!(f, "staging"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

/// A user's conversation session.
///
/// Holds the bounded message history together with the identity the
/// session was started with. Clearing the history never touches the
/// identity fields; a session keeps the environment it was created in
/// even if the application-level environment is switched later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub session_id: String,
    /// Display name of the session owner
    pub user: String,
    /// Role the session was started with
    pub role: UserRole,
    /// Environment the session was started in
    pub environment: Environment,
    /// Conversation history, oldest first, capped at [`MESSAGE_HISTORY_CAP`]
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session with an empty history.
    pub fn new(user: impl Into<String>, role: UserRole, environment: Environment) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user: user.into(),
            role,
            environment,
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a message, evicting the oldest entries past the cap.
    ///
    /// # Returns
    ///
    /// A reference to the stored message (with its assigned id and
    /// timestamp).
    pub fn append(&mut self, body: MessageBody) -> &Message {
        self.messages.push(Message::new(body));
        if self.messages.len() > MESSAGE_HISTORY_CAP {
            let overflow = self.messages.len() - MESSAGE_HISTORY_CAP;
            self.messages.drain(..overflow);
        }
        // Safe to unwrap because we just pushed an element
        self.messages.last().unwrap()
    }

    /// Empties the message history while preserving session identity.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Content of the most recent user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.body.is_user())
            .map(|m| m.body.content())
    }

    /// Looks up an attached answer by its id.
    pub fn answer_by_id(&self, answer_id: &str) -> Option<&Answer> {
        self.messages
            .iter()
            .rev()
            .filter_map(|m| m.body.answer())
            .find(|a| a.answer_id == answer_id)
    }

    /// The most recently attached answer, if any.
    pub fn latest_answer(&self) -> Option<&Answer> {
        self.messages.iter().rev().find_map(|m| m.body.answer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("alice", UserRole::User, Environment::Dev)
    }

    #[test]
    fn test_append_assigns_id_and_timestamp() {
        let mut s = session();
        let message = s.append(MessageBody::User {
            content: "vpn drops every hour".to_string(),
        });
        assert!(!message.id.is_empty());
        assert_eq!(message.body.content(), "vpn drops every hour");
        assert_eq!(s.messages.len(), 1);
    }

    #[test]
    fn test_history_keeps_only_last_twenty_in_order() {
        let mut s = session();
        for i in 0..25 {
            s.append(MessageBody::User {
                content: format!("message {}", i),
            });
        }
        assert_eq!(s.messages.len(), MESSAGE_HISTORY_CAP);
        assert_eq!(s.messages[0].body.content(), "message 5");
        assert_eq!(s.messages[19].body.content(), "message 24");
    }

    #[test]
    fn test_clear_preserves_identity() {
        let mut s = session();
        s.append(MessageBody::User {
            content: "hello".to_string(),
        });
        let id = s.session_id.clone();
        let created = s.created_at;

        s.clear_messages();

        assert!(s.messages.is_empty());
        assert_eq!(s.session_id, id);
        assert_eq!(s.created_at, created);
        assert_eq!(s.user, "alice");
        assert_eq!(s.environment, Environment::Dev);
    }

    #[test]
    fn test_last_user_text_skips_other_messages() {
        let mut s = session();
        assert!(s.last_user_text().is_none());

        s.append(MessageBody::User {
            content: "first".to_string(),
        });
        s.append(MessageBody::System {
            content: "notice".to_string(),
        });
        assert_eq!(s.last_user_text(), Some("first"));
    }
}
