//! API error types and JSON error response formatting.
//!
//! Errors keep the same body shape as successful chat replies so browser
//! clients render them in place: a user-facing `response`, the transient
//! `error` intent label, and raw detail only in the diagnostic field.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use mentor_chat::types::{ChatReply, INTENT_ERROR};
use mentor_chat::ChatError;

/// Fixed body for an empty or missing message.
pub const EMPTY_MESSAGE_BODY: &str = "Please enter a message.";
/// Fixed body for a malformed request payload.
pub const INVALID_REQUEST_BODY: &str = "Invalid request format.";
/// Fixed apology for unexpected internal failures.
pub const INTERNAL_ERROR_BODY: &str =
    "I apologize, but I encountered an error. Please try again.";

/// API error type that maps to HTTP status codes and chat-shaped bodies.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request with a fixed user-facing string.
    InvalidRequest(String),
    /// 500 Internal Server Error; detail attached for diagnostics only.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reply) = match self {
            ApiError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                ChatReply {
                    response: message,
                    intent: INTENT_ERROR.to_string(),
                    confidence: 0.0,
                    error: None,
                },
            ),
            ApiError::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ChatReply {
                    response: INTERNAL_ERROR_BODY.to_string(),
                    intent: INTENT_ERROR.to_string(),
                    confidence: 0.0,
                    error: Some(detail),
                },
            ),
        };

        (status, Json(reply)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => ApiError::InvalidRequest(EMPTY_MESSAGE_BODY.to_string()),
            ChatError::MessageTooLong(limit) => ApiError::InvalidRequest(format!(
                "Please keep your message under {} characters.",
                limit
            )),
            ChatError::Session(detail) => ApiError::Internal(detail),
        }
    }
}
