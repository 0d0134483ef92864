//! Integration tests for the Mentor API.
//!
//! Exercises every route against the real router with an offline chatbot
//! (no language model configured), so replies come from the deterministic
//! keyword and knowledge-base paths. Each test builds independent state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use mentor_api::create_router;
use mentor_api::handlers::{ChatResponseBody, HealthResponse, ResetResponse};
use mentor_api::state::AppState;
use mentor_chat::synthesizer::{FALLBACK_REPLIES, GREETING_REPLY};
use mentor_chat::Chatbot;
use mentor_core::config::MentorConfig;
use mentor_kb::{Intent, KnowledgeBase};

// =============================================================================
// Helpers
// =============================================================================

/// Create fresh offline state: builtin catalogue, no remote model.
fn make_state() -> AppState {
    let config = MentorConfig::default();
    let knowledge = Arc::new(KnowledgeBase::builtin());
    let chatbot = Chatbot::new(config.chat.clone(), knowledge, None);
    AppState::new(config, chatbot)
}

fn make_app() -> axum::Router {
    create_router(make_state())
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn chat(app: &axum::Router, json: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(post_json("/chat", json))
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body_bytes(resp).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// GET / and /health
// =============================================================================

#[tokio::test]
async fn test_index_serves_chat_page() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("Internship FAQ Assistant"));
}

#[tokio::test]
async fn test_health_happy_path() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.sessions, 0);
}

// =============================================================================
// POST /chat - happy paths
// =============================================================================

#[tokio::test]
async fn test_chat_hello_gets_fixed_greeting() {
    let app = make_app();
    let (status, body) = chat(&app, r#"{"message": "Hello"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], GREETING_REPLY);
    assert_eq!(body["intent"], "greeting");
    assert!((body["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert!(body.get("error").is_none());
    assert!(body["session_id"].as_str().is_some());
}

#[tokio::test]
async fn test_chat_stipend_gets_compensation_answer() {
    let app = make_app();
    let expected = KnowledgeBase::builtin()
        .lookup(Intent::Compensation)
        .unwrap()
        .answers[0]
        .clone();
    let (status, body) = chat(&app, r#"{"message": "Do interns get a stipend?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "compensation");
    assert_eq!(body["response"], expected);
}

#[tokio::test]
async fn test_chat_gibberish_gets_fallback() {
    let app = make_app();
    let (status, body) = chat(&app, r#"{"message": "quantum zebra xylophone"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "fallback");
    assert!((body["confidence"].as_f64().unwrap() - 0.0).abs() < 1e-6);
    let response = body["response"].as_str().unwrap();
    assert!(FALLBACK_REPLIES.contains(&response));
}

#[tokio::test]
async fn test_chat_session_id_round_trips() {
    let app = make_app();
    let (_, first) = chat(&app, r#"{"message": "Hello"}"#).await;
    let sid = first["session_id"].as_str().unwrap().to_string();

    let (_, second) = chat(
        &app,
        &format!(r#"{{"message": "When are deadlines?", "session_id": "{}"}}"#, sid),
    )
    .await;
    assert_eq!(second["session_id"].as_str().unwrap(), sid);
}

#[tokio::test]
async fn test_chat_unknown_session_id_gets_new_one() {
    let app = make_app();
    let fake = Uuid::new_v4();
    let (_, body) = chat(
        &app,
        &format!(r#"{{"message": "Hello", "session_id": "{}"}}"#, fake),
    )
    .await;
    assert_ne!(body["session_id"].as_str().unwrap(), fake.to_string());
}

#[tokio::test]
async fn test_chat_response_body_deserializes() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/chat", r#"{"message": "Hello"}"#))
        .await
        .unwrap();
    let bytes = body_bytes(resp).await;
    let parsed: ChatResponseBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed.intent, "greeting");
    assert!(parsed.error.is_none());
}

// =============================================================================
// POST /chat - validation
// =============================================================================

#[tokio::test]
async fn test_chat_empty_message_is_400() {
    let app = make_app();
    let (status, body) = chat(&app, r#"{"message": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], "Please enter a message.");
    assert_eq!(body["intent"], "error");
}

#[tokio::test]
async fn test_chat_whitespace_message_is_400() {
    let app = make_app();
    let (status, body) = chat(&app, r#"{"message": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["intent"], "error");
}

#[tokio::test]
async fn test_chat_missing_message_field_is_400() {
    let app = make_app();
    let (status, body) = chat(&app, r#"{}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], "Please enter a message.");
}

#[tokio::test]
async fn test_chat_malformed_body_is_400() {
    let app = make_app();
    let (status, body) = chat(&app, "not json at all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], "Invalid request format.");
    assert_eq!(body["intent"], "error");
}

#[tokio::test]
async fn test_chat_missing_content_type_is_400() {
    let app = make_app();
    let req = Request::post("/chat")
        .body(Body::from(r#"{"message": "Hello"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = body_bytes(resp).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["response"], "Invalid request format.");
}

#[tokio::test]
async fn test_chat_over_long_message_is_400() {
    let app = make_app();
    let long = "a".repeat(2001);
    let (status, body) = chat(&app, &format!(r#"{{"message": "{}"}}"#, long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["intent"], "error");
    assert!(body["response"].as_str().unwrap().contains("2000"));
}

// =============================================================================
// POST /reset
// =============================================================================

#[tokio::test]
async fn test_reset_returns_fixed_body() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/reset", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    let parsed: ResetResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed.status, "success");
    assert_eq!(parsed.message, "Conversation reset");
}

#[tokio::test]
async fn test_reset_with_empty_body_succeeds() {
    let app = make_app();
    let resp = app
        .oneshot(Request::post("/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reset_all_clears_sessions() {
    let state = make_state();
    let app = create_router(state.clone());

    chat(&app, r#"{"message": "Hello"}"#).await;
    chat(&app, r#"{"message": "Hello"}"#).await;
    assert_eq!(state.chatbot.session_count(), 2);

    app.clone()
        .oneshot(post_json("/reset", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(state.chatbot.session_count(), 0);
}

#[tokio::test]
async fn test_reset_single_session_keeps_others() {
    let state = make_state();
    let app = create_router(state.clone());

    let (_, first) = chat(&app, r#"{"message": "Hello"}"#).await;
    chat(&app, r#"{"message": "Hello"}"#).await;
    let sid = first["session_id"].as_str().unwrap();

    app.clone()
        .oneshot(post_json(
            "/reset",
            &format!(r#"{{"session_id": "{}"}}"#, sid),
        ))
        .await
        .unwrap();

    // Both sessions still exist; the targeted one is just emptied.
    assert_eq!(state.chatbot.session_count(), 2);
    let history = state
        .chatbot
        .history(Uuid::parse_str(sid).unwrap())
        .unwrap();
    assert!(history.is_empty());
}

// =============================================================================
// Sessions accumulate via the API
// =============================================================================

#[tokio::test]
async fn test_health_reports_live_sessions() {
    let state = make_state();
    let app = create_router(state.clone());

    chat(&app, r#"{"message": "Hello"}"#).await;
    let resp = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = body_bytes(resp).await;
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.sessions, 1);
}

#[tokio::test]
async fn test_conversation_history_accumulates() {
    let state = make_state();
    let app = create_router(state.clone());

    let (_, first) = chat(&app, r#"{"message": "Hello"}"#).await;
    let sid = first["session_id"].as_str().unwrap().to_string();
    chat(
        &app,
        &format!(r#"{{"message": "thanks", "session_id": "{}"}}"#, sid),
    )
    .await;

    let history = state
        .chatbot
        .history(Uuid::parse_str(&sid).unwrap())
        .unwrap();
    assert_eq!(history.len(), 4); // two exchanges
}

// =============================================================================
// Unknown routes
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_get_method_not_allowed() {
    let app = make_app();
    let resp = app
        .oneshot(Request::get("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
