//! Intent classification.
//!
//! Primary path: a structured prompt enumerating the fixed taxonomy, sent
//! to the remote model in JSON mode. Secondary path: pure, deterministic
//! keyword scoring that needs no network at all. Any remote problem routes
//! to the secondary path, never to the caller.

use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use mentor_kb::Intent;

use crate::llm::{ChatMessage, CompletionRequest, LanguageModel, LlmError};
use crate::types::IntentClassification;

/// Keyword phrases per intent, matched as substrings of the lowercased
/// message. Table order is the tie-break order: the earliest intent with
/// the highest score wins.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::ApplicationProcess,
        &["apply", "application", "submit", "resume", "cv", "cover letter", "portfolio"],
    ),
    (
        Intent::Requirements,
        &["requirements", "qualifications", "skills", "eligible", "gpa", "prerequisites"],
    ),
    (
        Intent::Timeline,
        &["when", "deadline", "timeline", "duration", "how long", "start date", "end date"],
    ),
    (
        Intent::Compensation,
        &["pay", "paid", "salary", "wage", "money", "compensation", "benefits", "stipend"],
    ),
    (
        Intent::Location,
        &["where", "location", "remote", "work from home", "relocate", "city", "office"],
    ),
    (
        Intent::SelectionProcess,
        &["interview", "selection", "process", "chosen", "assessment", "test"],
    ),
    (
        Intent::ProgramDetails,
        &["what do", "responsibilities", "tasks", "projects", "mentor", "training"],
    ),
    (
        Intent::CompanyCulture,
        &["culture", "environment", "dress code", "workplace", "team"],
    ),
    (
        Intent::Preparation,
        &["prepare", "ready", "tips", "advice", "how to"],
    ),
    (
        Intent::Greeting,
        &["hello", "hi", "hey", "good morning", "good afternoon"],
    ),
    (
        Intent::Goodbye,
        &["bye", "goodbye", "thank you", "thanks", "see you"],
    ),
];

/// Classifies messages into the fixed intent taxonomy.
pub struct IntentClassifier {
    model: Option<Arc<dyn LanguageModel>>,
}

impl IntentClassifier {
    /// Create a classifier. With no model, every message takes the keyword
    /// path.
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// Classify a message. Never fails: any remote problem falls back to
    /// keyword scoring.
    ///
    /// Empty messages are rejected by the orchestrator before this point;
    /// the classifier does not special-case them.
    pub async fn classify(&self, message: &str) -> IntentClassification {
        if let Some(model) = &self.model {
            match classify_remote(model.as_ref(), message).await {
                Ok(classification) => return classification,
                Err(e) => {
                    warn!(error = %e, "Remote intent classification failed; using keyword fallback");
                }
            }
        }
        classify_keywords(message)
    }
}

async fn classify_remote(
    model: &dyn LanguageModel,
    message: &str,
) -> Result<IntentClassification, LlmError> {
    let request = CompletionRequest {
        messages: vec![
            ChatMessage::system(classification_prompt()),
            ChatMessage::user(message),
        ],
        json_mode: true,
    };
    let content = model.complete(request).await?;
    parse_classification(&content)
}

/// Parse the model's JSON object. Structurally invalid output — bad JSON,
/// an unknown intent label, an out-of-range confidence — is an error so
/// the caller can fall back.
fn parse_classification(content: &str) -> Result<IntentClassification, LlmError> {
    #[derive(Deserialize)]
    struct Raw {
        intent: String,
        confidence: f32,
        #[serde(default)]
        entities: Vec<String>,
    }

    let raw: Raw =
        serde_json::from_str(content).map_err(|e| LlmError::Malformed(e.to_string()))?;
    let intent = Intent::parse(&raw.intent)
        .ok_or_else(|| LlmError::Malformed(format!("unknown intent label '{}'", raw.intent)))?;
    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(LlmError::Malformed(format!(
            "confidence {} out of range",
            raw.confidence
        )));
    }
    Ok(IntentClassification {
        intent,
        confidence: raw.confidence,
        entities: raw.entities,
    })
}

/// Deterministic keyword scoring: identical input always yields an
/// identical classification, with confidence in [0.1, 0.9].
pub fn classify_keywords(message: &str) -> IntentClassification {
    let message_lower = message.to_lowercase();

    let mut best_intent = Intent::GeneralInfo;
    let mut best_score = 0usize;
    for (intent, keywords) in INTENT_KEYWORDS {
        let score = keywords
            .iter()
            .filter(|kw| message_lower.contains(**kw))
            .count();
        // Strictly greater: ties keep the earliest intent in table order.
        if score > best_score {
            best_score = score;
            best_intent = *intent;
        }
    }

    let confidence = if best_score > 0 {
        (best_score as f32 * 0.3).min(0.9)
    } else {
        0.1
    };

    IntentClassification {
        intent: best_intent,
        confidence,
        entities: Vec::new(),
    }
}

/// System prompt enumerating the taxonomy and the required JSON shape.
fn classification_prompt() -> String {
    let mut lines = vec![
        "You are an intent classifier for an internship FAQ chatbot.".to_string(),
        "Classify the user's message into one of these intents and provide a confidence score:"
            .to_string(),
        String::new(),
        "Available intents:".to_string(),
    ];
    for intent in Intent::ALL {
        lines.push(format!("- {}: {}", intent, intent.description()));
    }
    lines.push(String::new());
    lines.push("Respond with JSON in this format:".to_string());
    lines.push(
        r#"{"intent": "intent_name", "confidence": 0.95, "entities": ["relevant", "keywords"]}"#
            .to_string(),
    );
    lines.join("\n")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;

    // ---- Keyword fallback ----

    #[test]
    fn test_keywords_greeting() {
        let c = classify_keywords("Hello");
        assert_eq!(c.intent, Intent::Greeting);
        assert!((c.confidence - 0.3).abs() < f32::EPSILON);
        assert!(c.entities.is_empty());
    }

    #[test]
    fn test_keywords_stipend_is_compensation() {
        let c = classify_keywords("Do interns get a stipend?");
        assert_eq!(c.intent, Intent::Compensation);
        assert!(c.confidence > 0.0);
    }

    #[test]
    fn test_keywords_no_match_is_general_info() {
        let c = classify_keywords("zebras and xylophones");
        assert_eq!(c.intent, Intent::GeneralInfo);
        assert!((c.confidence - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_keywords_deterministic() {
        let a = classify_keywords("how do I apply and what skills do I need");
        let b = classify_keywords("how do I apply and what skills do I need");
        assert_eq!(a, b);
    }

    #[test]
    fn test_keywords_confidence_always_in_range() {
        let inputs = [
            "",
            "hello",
            "apply application submit resume cv cover letter portfolio",
            "pay paid salary wage money compensation benefits stipend",
            "random nonsense",
        ];
        for input in inputs {
            let c = classify_keywords(input);
            assert!(
                (0.1..=0.9).contains(&c.confidence),
                "confidence {} out of range for {:?}",
                c.confidence,
                input
            );
        }
    }

    #[test]
    fn test_keywords_confidence_caps_at_09() {
        // Seven application keywords: 7 * 0.3 clamps to 0.9.
        let c = classify_keywords("apply application submit resume cv cover letter portfolio");
        assert_eq!(c.intent, Intent::ApplicationProcess);
        assert!((c.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_keywords_score_scaling() {
        // "pay" and "salary": two compensation keywords.
        let c = classify_keywords("what is the pay or salary like");
        assert_eq!(c.intent, Intent::Compensation);
        assert!((c.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_keywords_tie_keeps_earlier_intent() {
        // One compensation keyword ("pay") and one location keyword
        // ("office"): compensation is declared earlier and wins the tie.
        let c = classify_keywords("pay office");
        assert_eq!(c.intent, Intent::Compensation);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let c = classify_keywords("HELLO");
        assert_eq!(c.intent, Intent::Greeting);
    }

    #[test]
    fn test_keywords_thanks_is_goodbye() {
        let c = classify_keywords("ok thanks");
        assert_eq!(c.intent, Intent::Goodbye);
    }

    #[test]
    fn test_keywords_phrase_match() {
        let c = classify_keywords("can I work from home during the internship");
        assert_eq!(c.intent, Intent::Location);
    }

    // ---- Remote parsing ----

    #[test]
    fn test_parse_classification_valid() {
        let c = parse_classification(
            r#"{"intent": "compensation", "confidence": 0.95, "entities": ["stipend"]}"#,
        )
        .unwrap();
        assert_eq!(c.intent, Intent::Compensation);
        assert!((c.confidence - 0.95).abs() < f32::EPSILON);
        assert_eq!(c.entities, vec!["stipend".to_string()]);
    }

    #[test]
    fn test_parse_classification_missing_entities_defaults_empty() {
        let c = parse_classification(r#"{"intent": "greeting", "confidence": 0.9}"#).unwrap();
        assert!(c.entities.is_empty());
    }

    #[test]
    fn test_parse_classification_bad_json() {
        let err = parse_classification("not json at all").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[test]
    fn test_parse_classification_unknown_intent() {
        let err =
            parse_classification(r#"{"intent": "weather", "confidence": 0.9}"#).unwrap_err();
        assert!(err.to_string().contains("unknown intent label"));
    }

    #[test]
    fn test_parse_classification_confidence_out_of_range() {
        let err =
            parse_classification(r#"{"intent": "greeting", "confidence": 1.5}"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    // ---- Classify: remote and fallback wiring ----

    #[tokio::test]
    async fn test_classify_without_model_uses_keywords() {
        let classifier = IntentClassifier::new(None);
        let c = classifier.classify("hello").await;
        assert_eq!(c.intent, Intent::Greeting);
        assert!((c.confidence - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_classify_uses_remote_result() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            r#"{"intent": "timeline", "confidence": 0.92, "entities": ["deadline"]}"#.to_string(),
        )]));
        let classifier = IntentClassifier::new(Some(model.clone()));
        let c = classifier.classify("when is the deadline").await;
        assert_eq!(c.intent, Intent::Timeline);
        assert!((c.confidence - 0.92).abs() < f32::EPSILON);

        // The request enumerated the taxonomy in JSON mode.
        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_mode);
        assert!(requests[0].messages[0].content.contains("- timeline:"));
        assert_eq!(requests[0].messages[1].content, "when is the deadline");
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_transport_error() {
        let model = Arc::new(ScriptedModel::failing());
        let classifier = IntentClassifier::new(Some(model));
        let c = classifier.classify("hello").await;
        assert_eq!(c.intent, Intent::Greeting);
        assert!((c.confidence - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_malformed_output() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("not json".to_string())]));
        let classifier = IntentClassifier::new(Some(model));
        let c = classifier.classify("what is the stipend").await;
        assert_eq!(c.intent, Intent::Compensation);
    }

    #[tokio::test]
    async fn test_classify_falls_back_on_unknown_label() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            r#"{"intent": "weather", "confidence": 0.8}"#.to_string(),
        )]));
        let classifier = IntentClassifier::new(Some(model));
        let c = classifier.classify("hello").await;
        assert_eq!(c.intent, Intent::Greeting);
    }

    // ---- Prompt ----

    #[test]
    fn test_classification_prompt_lists_all_intents() {
        let prompt = classification_prompt();
        for intent in Intent::ALL {
            assert!(
                prompt.contains(&format!("- {}:", intent)),
                "prompt missing {}",
                intent
            );
        }
        assert!(prompt.contains("Respond with JSON"));
    }
}
