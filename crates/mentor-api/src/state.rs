//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use mentor_chat::Chatbot;
use mentor_core::config::MentorConfig;

/// Shared application state, cloned per handler task.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after startup).
    pub config: Arc<MentorConfig>,
    /// The message-handling pipeline.
    pub chatbot: Arc<Chatbot>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(config: MentorConfig, chatbot: Chatbot) -> Self {
        Self {
            config: Arc::new(config),
            chatbot: Arc::new(chatbot),
            start_time: Instant::now(),
        }
    }
}
