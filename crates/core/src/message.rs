//! Conversation message value objects.
//!
//! A `ChatMessage` is the unit that flows through the whole pipeline:
//! the visitor's browser sends a list of them, the validator checks them,
//! the trimmer bounds them, and each provider adapter translates them
//! into its own wire format.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
///
/// Only visitor turns and assistant turns are accepted from callers;
/// the system prompt is derived server-side from the knowledge corpus
/// and is never part of the inbound history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The site visitor
    User,
    /// The AI assistant
    Assistant,
}

/// A single message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: Role,

    /// The text content (non-empty by construction via validation)
    pub content: String,
}

impl ChatMessage {
    /// Create a new visitor message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
