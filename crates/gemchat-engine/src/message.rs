//! Message types for a chat session.
//!
//! A session is an append-only list of [`ChatMessage`]s in conversation
//! order. Nothing here is persisted; the list lives as long as the
//! [`crate::Conversation`] that owns it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply appended in place of the model's answer when a turn fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl Role {
    /// Lowercase wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create the assistant message recorded for a failed turn.
    pub fn fallback() -> Self {
        Self::assistant(FALLBACK_REPLY)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let user_msg = ChatMessage::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");
        assert!(user_msg.is_user());

        let assistant_msg = ChatMessage::assistant("Hi there!");
        assert_eq!(assistant_msg.role, Role::Assistant);
        assert!(assistant_msg.is_assistant());
    }

    #[test]
    fn test_fallback_message() {
        let msg = ChatMessage::fallback();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Sorry, I encountered an error. Please try again.");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
