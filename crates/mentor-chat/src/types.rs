//! Shared types for the conversation pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use mentor_kb::Intent;

/// Reply label used when no intent could be resolved.
pub const INTENT_FALLBACK: &str = "fallback";
/// Reply label used for validation and internal failures.
pub const INTENT_ERROR: &str = "error";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One utterance in a conversation, owned by its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Result of classifying one message. Produced fresh per message; never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentClassification {
    pub intent: Intent,
    /// Certainty of the intent assignment, in [0, 1].
    pub confidence: f32,
    /// Keywords the classifier extracted from the message.
    pub entities: Vec<String>,
}

/// The structured reply returned for each message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// Intent label. May be a transient label (`fallback`, `error`) that is
    /// synthesized, never looked up in the knowledge base.
    pub intent: String,
    pub confidence: f32,
    /// Diagnostic detail attached to internal failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
