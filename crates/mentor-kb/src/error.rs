//! Error types for knowledge base loading and validation.

use mentor_core::error::MentorError;

/// Errors from loading or validating the FAQ catalogue.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read FAQ document: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse FAQ document: {0}")]
    Parse(String),
    #[error("invalid FAQ catalogue: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for KnowledgeError {
    fn from(err: toml::de::Error) -> Self {
        KnowledgeError::Parse(err.to_string())
    }
}

impl From<KnowledgeError> for MentorError {
    fn from(err: KnowledgeError) -> Self {
        MentorError::Knowledge(err.to_string())
    }
}
