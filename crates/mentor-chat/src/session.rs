//! Conversation session state.
//!
//! Each logical conversation owns a bounded rolling history of turns,
//! consumed by the synthesizer for contextual prompts and appended to on
//! every exchange. The [`SessionManager`] applies the history bound and
//! idle expiry.

use chrono::Local;
use uuid::Uuid;

use crate::types::Turn;

/// One logical conversation's bounded rolling history.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    /// Epoch seconds when the session was created.
    pub started_at: i64,
    /// Epoch seconds of the most recent exchange.
    pub last_message_at: i64,
    history: Vec<Turn>,
}

impl ConversationSession {
    /// Append a turn, evicting the oldest once `limit` is exceeded.
    pub fn append(&mut self, turn: Turn, limit: usize) {
        self.history.push(turn);
        while self.history.len() > limit {
            self.history.remove(0);
        }
    }

    /// The last `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// The full retained history, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Reset the history to empty.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

/// Creates sessions and applies the history bound and idle expiry.
pub struct SessionManager {
    /// Maximum turns retained per session.
    pub max_history_turns: usize,
    /// Idle minutes before a session is considered expired.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(max_history_turns: usize, session_timeout_minutes: u32) -> Self {
        Self {
            max_history_turns,
            session_timeout_minutes,
        }
    }

    /// Create a fresh, empty session.
    pub fn create_session(&self) -> ConversationSession {
        let now = Local::now().timestamp();
        ConversationSession {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            history: Vec::new(),
        }
    }

    /// Whether a session has been idle beyond the configured timeout.
    pub fn is_expired(&self, session: &ConversationSession) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.last_message_at > timeout_secs
    }

    /// Record one user/assistant exchange and bump the activity timestamp.
    pub fn record_exchange(
        &self,
        session: &mut ConversationSession,
        message: &str,
        response: &str,
    ) {
        session.append(Turn::user(message), self.max_history_turns);
        session.append(Turn::assistant(response), self.max_history_turns);
        session.last_message_at = Local::now().timestamp();
    }
}

// =============================================================================
// Tests
// =============================================================================
