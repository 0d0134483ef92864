//! Route handler functions for all API endpoints.
//!
//! Each handler extracts the JSON body via axum extractors, interacts with
//! the chatbot held in AppState, and returns JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, EMPTY_MESSAGE_BODY, INVALID_REQUEST_BODY};
use crate::state::AppState;

/// The self-contained chat page served at `/`.
const CHAT_PAGE: &str = include_str!("../static/index.html");

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message. Optional so a missing field gets the same fixed
    /// response as an empty one.
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation to continue; omitted on the first message.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub intent: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub session_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - serve the embedded chat page.
pub async fn index() -> impl IntoResponse {
    Html(CHAT_PAGE)
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.chatbot.session_count(),
    })
}

/// POST /chat - classify a message and synthesize a reply.
///
/// A malformed body and an empty message each get their fixed 400 body;
/// everything past validation answers 200, because the pipeline degrades
/// internally rather than failing.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let Json(request) =
        body.map_err(|_| ApiError::InvalidRequest(INVALID_REQUEST_BODY.to_string()))?;

    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::InvalidRequest(EMPTY_MESSAGE_BODY.to_string()));
    }

    let (reply, session_id) = state
        .chatbot
        .handle_message(&message, request.session_id)
        .await?;

    Ok(Json(ChatResponseBody {
        response: reply.response,
        intent: reply.intent,
        confidence: reply.confidence,
        error: reply.error,
        session_id,
    }))
}

/// POST /reset - clear a session, or every session when no id is given.
///
/// Accepts an empty or malformed body as "reset everything" so the page's
/// bare POST keeps working.
pub async fn reset(
    State(state): State<AppState>,
    body: Result<Json<ResetRequest>, JsonRejection>,
) -> Json<ResetResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let cleared = state.chatbot.reset(request.session_id);
    tracing::debug!(cleared, "Conversation reset");

    Json(ResetResponse {
        status: "success".to_string(),
        message: "Conversation reset".to_string(),
    })
}
