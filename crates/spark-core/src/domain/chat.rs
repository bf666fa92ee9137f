//! Chat message types and the system-prompt merge rule.

use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message, in conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Apply the system-prompt merge rule.
///
/// A non-empty `system_prompt` becomes a new leading system message unless
/// `messages` already starts with one, in which case the caller's leading
/// system message wins and `system_prompt` is dropped.
pub fn merge_system_prompt(
    messages: Vec<ChatMessage>,
    system_prompt: Option<&str>,
) -> Vec<ChatMessage> {
    let Some(prompt) = system_prompt.filter(|p| !p.is_empty()) else {
        return messages;
    };

    if messages
        .first()
        .is_some_and(|m| m.role == MessageRole::System)
    {
        return messages;
    }

    let mut merged = Vec::with_capacity(messages.len() + 1);
    merged.push(ChatMessage::system(prompt));
    merged.extend(messages);
    merged
}
