//! Error types for the conversation pipeline.

use mentor_core::error::MentorError;

/// Errors surfaced by the chat pipeline to its callers.
///
/// Remote-model failures never appear here: the classifier and synthesizer
/// recover from them internally with deterministic strategies.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session error: {0}")]
    Session(String),
}

impl From<ChatError> for MentorError {
    fn from(err: ChatError) -> Self {
        MentorError::Chat(err.to_string())
    }
}
