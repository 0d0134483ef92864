//! Chatbot orchestrator: wires classifier, synthesizer, and sessions.
//!
//! One session per logical conversation, keyed by a caller-supplied id and
//! passed explicitly through the pipeline; cross-session state is never
//! shared. Control flow per message: validate, resolve session, classify,
//! synthesize, record the exchange.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use mentor_core::config::ChatConfig;
use mentor_kb::KnowledgeBase;

use crate::classifier::IntentClassifier;
use crate::error::ChatError;
use crate::llm::LanguageModel;
use crate::session::{ConversationSession, SessionManager};
use crate::synthesizer::ResponseSynthesizer;
use crate::types::{ChatReply, Turn};

type SessionMap = HashMap<Uuid, ConversationSession>;

/// The complete message-handling pipeline.
pub struct Chatbot {
    classifier: IntentClassifier,
    synthesizer: ResponseSynthesizer,
    session_manager: SessionManager,
    sessions: Mutex<SessionMap>,
    config: ChatConfig,
}

impl Chatbot {
    /// Assemble the pipeline. With no model, classification and synthesis
    /// run on their deterministic offline paths.
    pub fn new(
        config: ChatConfig,
        knowledge: Arc<KnowledgeBase>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        let classifier = IntentClassifier::new(model.clone());
        let synthesizer = ResponseSynthesizer::new(model, knowledge);
        let session_manager =
            SessionManager::new(config.max_history_turns, config.session_timeout_minutes);
        Self {
            classifier,
            synthesizer,
            session_manager,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Handle one inbound message.
    ///
    /// Returns the reply and the effective session id (new or existing).
    /// Remote-model problems never surface here; only input validation and
    /// session-state failures do.
    pub async fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<(ChatReply, Uuid), ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong(self.config.max_message_chars));
        }

        // Resolve the session and snapshot its recent turns. The lock is
        // never held across an await.
        let (sid, context) = {
            let mut sessions = self.lock_sessions()?;
            let sid = self.resolve_session(&mut sessions, session_id);
            let context: Vec<Turn> = sessions
                .get(&sid)
                .map(|s| s.recent(self.config.context_turns).to_vec())
                .unwrap_or_default();
            (sid, context)
        };

        let classification = self.classifier.classify(message).await;
        debug!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "Message classified"
        );

        let reply = self
            .synthesizer
            .respond(message, &classification, &context)
            .await;

        {
            let mut sessions = self.lock_sessions()?;
            if let Some(session) = sessions.get_mut(&sid) {
                self.session_manager
                    .record_exchange(session, message, &reply.response);
            }
        }

        Ok((reply, sid))
    }

    /// Clear one session's history, or drop every session when no id is
    /// given. Returns the number of sessions affected.
    pub fn reset(&self, session_id: Option<Uuid>) -> usize {
        let mut sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return 0,
        };
        match session_id {
            Some(sid) => match sessions.get_mut(&sid) {
                Some(session) => {
                    session.clear();
                    1
                }
                None => 0,
            },
            None => {
                let count = sessions.len();
                sessions.clear();
                count
            }
        }
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Snapshot a session's retained history.
    pub fn history(&self, session_id: Uuid) -> Option<Vec<Turn>> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(&session_id).map(|sess| sess.history().to_vec()))
    }

    // -- Private helpers --

    fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionMap>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::Session(format!("session lock poisoned: {}", e)))
    }

    /// Reuse the requested session unless it is missing or expired; expired
    /// sessions are dropped and replaced.
    fn resolve_session(&self, sessions: &mut SessionMap, requested: Option<Uuid>) -> Uuid {
        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.session_manager.is_expired(session) {
                    return sid;
                }
                sessions.remove(&sid);
            }
        }

        let session = self.session_manager.create_session();
        let sid = session.id;
        sessions.insert(sid, session);
        sid
    }
}

// =============================================================================
// Tests
// =============================================================================
