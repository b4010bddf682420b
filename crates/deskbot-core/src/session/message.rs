//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation.
//! The payload is a tagged enum so that only bot messages can carry a
//! generated answer.

use crate::generation::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The payload of a conversation message.
///
/// Serialized with a `type` tag (`user`, `bot`, `system`) so persisted
/// histories stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    /// A message typed by the user.
    User { content: String },
    /// A message produced by the assistant, optionally carrying the
    /// generated answer it presents.
    Bot {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<Answer>,
    },
    /// An application-generated notice (errors, status changes).
    System { content: String },
}

impl MessageBody {
    /// Returns the display text of the message.
    pub fn content(&self) -> &str {
        match self {
            MessageBody::User { content }
            | MessageBody::Bot { content, .. }
            | MessageBody::System { content } => content,
        }
    }

    /// Returns the attached answer, if any.
    pub fn answer(&self) -> Option<&Answer> {
        match self {
            MessageBody::Bot { answer, .. } => answer.as_ref(),
            _ => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, MessageBody::User { .. })
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// Timestamp when the message was created
    pub timestamp: DateTime<Utc>,
    /// The message payload
    #[serde(flatten)]
    pub body: MessageBody,
}

impl Message {
    /// Creates a new message with a fresh id and the current timestamp.
    pub fn new(body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            body,
        }
    }

    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageBody::User {
            content: content.into(),
        })
    }

    /// Convenience constructor for a bot message with an attached answer.
    pub fn bot(content: impl Into<String>, answer: Answer) -> Self {
        Self::new(MessageBody::Bot {
            content: content.into(),
            answer: Some(answer),
        })
    }

    /// Convenience constructor for a system notice.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageBody::System {
            content: content.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_tag_round_trip() {
        let message = Message::system("maintenance window");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"type\":\"system\""));

        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.body.content(), "maintenance window");
    }

    #[test]
    fn test_only_bot_messages_expose_answers() {
        let user = Message::user("vpn is down");
        assert!(user.body.answer().is_none());
        assert!(user.body.is_user());

        let system = Message::system("notice");
        assert!(system.body.answer().is_none());
    }
}
