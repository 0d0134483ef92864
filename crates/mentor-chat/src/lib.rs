//! Conversational pipeline for the Mentor internship FAQ chatbot.
//!
//! Provides intent classification (remote model with a deterministic
//! keyword fallback), confidence-dispatched response synthesis, and
//! bounded per-conversation session state.

pub mod classifier;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod session;
pub mod synthesizer;
pub mod types;

pub use classifier::IntentClassifier;
pub use error::ChatError;
pub use llm::{ChatMessage, CompletionRequest, LanguageModel, LlmError, OpenAiClient};
pub use orchestrator::Chatbot;
pub use session::{ConversationSession, SessionManager};
pub use synthesizer::ResponseSynthesizer;
pub use types::{ChatReply, IntentClassification, Role, Turn};
