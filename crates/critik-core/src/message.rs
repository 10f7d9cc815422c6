//! Conversation primitives.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
///
/// Serialized with Gemini's wire vocabulary: the assistant side of the
/// conversation is `"model"`, not `"assistant"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Model response
    Model,
}

/// One message attributed to either role within a conversation.
///
/// A conversation transcript is an ordered `Vec<Turn>`; insertion order is
/// conversation order and the sequence is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Turn role
    pub role: Role,
    /// Turn text
    pub text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}
