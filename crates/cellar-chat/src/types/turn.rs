//! Conversation turn records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label used when rendering history into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in the conversation, immutable once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it
    pub role: Role,
    /// What was said
    pub text: String,
    /// When it was recorded
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
