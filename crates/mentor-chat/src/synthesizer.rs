//! Response synthesis.
//!
//! Dispatches on classification confidence: contextual generation above the
//! threshold, direct knowledge-base answers in the mid band, and a fixed
//! apology/redirect otherwise. The single degrade step is generation
//! failure falling to the knowledge-base answer for the same intent; there
//! are no retries.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use tracing::warn;

use mentor_kb::{Intent, KnowledgeBase};

use crate::llm::{ChatMessage, CompletionRequest, LanguageModel};
use crate::types::{ChatReply, IntentClassification, Turn, INTENT_FALLBACK};

/// Confidence above which contextual generation is attempted.
const GENERATION_THRESHOLD: f32 = 0.7;

/// Canned reply for greetings on the knowledge-base path.
pub const GREETING_REPLY: &str = "Hello! I'm here to help you with internship-related questions. Feel free to ask about application processes, requirements, timelines, compensation, and more!";

/// Canned reply for farewells on the knowledge-base path.
pub const GOODBYE_REPLY: &str = "Thank you for using the internship FAQ assistant! Best of luck with your internship search and applications!";

/// Capability statement for intents with no catalogue entry.
pub const CAPABILITY_REPLY: &str = "I can help you with various internship topics including: application processes, eligibility requirements, timelines, compensation, interview processes, and program details. What specific aspect would you like to know about?";

/// Apology/redirect replies for unresolved intents, chosen uniformly.
pub const FALLBACK_REPLIES: [&str; 4] = [
    "I'm not sure I understand your question completely. Could you please rephrase it or ask about specific aspects of internships like application process, requirements, or timelines?",
    "That's an interesting question! While I specialize in internship-related topics, I'd be happy to help if you could ask about internship applications, requirements, or program details.",
    "I want to make sure I give you the most accurate information. Could you please clarify what specific aspect of internships you'd like to know about?",
    "I'm here to help with internship-related questions. Feel free to ask about application processes, eligibility requirements, timelines, or any other internship topics!",
];

/// Turns a classified message into a [`ChatReply`].
pub struct ResponseSynthesizer {
    model: Option<Arc<dyn LanguageModel>>,
    knowledge: Arc<KnowledgeBase>,
}

impl ResponseSynthesizer {
    pub fn new(model: Option<Arc<dyn LanguageModel>>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self { model, knowledge }
    }

    /// Produce a reply for a classified message. Never fails: every remote
    /// problem degrades to a deterministic strategy.
    pub async fn respond(
        &self,
        message: &str,
        classification: &IntentClassification,
        context: &[Turn],
    ) -> ChatReply {
        if classification.confidence > GENERATION_THRESHOLD {
            return self.contextual_reply(message, classification, context).await;
        }
        if classification.confidence > 0.0 && classification.intent != Intent::Other {
            return self.knowledge_base_reply(classification.intent);
        }
        self.fallback_reply()
    }

    /// Contextual generation grounded in recent turns and the FAQ digest.
    /// Degrades to the knowledge-base answer for the same intent.
    async fn contextual_reply(
        &self,
        message: &str,
        classification: &IntentClassification,
        context: &[Turn],
    ) -> ChatReply {
        let Some(model) = &self.model else {
            return self.knowledge_base_reply(classification.intent);
        };

        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(generation_prompt(classification, context, &self.knowledge)),
                ChatMessage::user(message),
            ],
            json_mode: false,
        };

        match model.complete(request).await {
            Ok(text) => ChatReply {
                response: text,
                intent: classification.intent.as_str().to_string(),
                confidence: classification.confidence,
                error: None,
            },
            Err(e) => {
                warn!(
                    error = %e,
                    intent = %classification.intent,
                    "Contextual generation failed; answering from the knowledge base"
                );
                self.knowledge_base_reply(classification.intent)
            }
        }
    }

    /// Direct knowledge-base reply: canned strings for greetings and
    /// farewells, the entry's lead answer otherwise. Intents without a
    /// catalogue entry get the generic capability statement.
    pub fn knowledge_base_reply(&self, intent: Intent) -> ChatReply {
        match self.knowledge.lookup(intent) {
            Some(entry) => {
                let response = match intent {
                    Intent::Greeting => GREETING_REPLY.to_string(),
                    Intent::Goodbye => GOODBYE_REPLY.to_string(),
                    _ => entry.answers[0].clone(),
                };
                ChatReply {
                    response,
                    intent: intent.as_str().to_string(),
                    confidence: 0.8,
                    error: None,
                }
            }
            None => ChatReply {
                response: CAPABILITY_REPLY.to_string(),
                intent: Intent::GeneralInfo.as_str().to_string(),
                confidence: 0.6,
                error: None,
            },
        }
    }

    /// One of the four fixed apology/redirect strings, chosen uniformly.
    pub fn fallback_reply(&self) -> ChatReply {
        let response = FALLBACK_REPLIES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(FALLBACK_REPLIES[0]);
        ChatReply {
            response: response.to_string(),
            intent: INTENT_FALLBACK.to_string(),
            confidence: 0.0,
            error: None,
        }
    }
}

/// Build the grounding prompt: recent turns, the matched FAQ digest, and
/// the response guidelines.
fn generation_prompt(
    classification: &IntentClassification,
    context: &[Turn],
    knowledge: &KnowledgeBase,
) -> String {
    let context_lines = context
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = knowledge.summarize(classification.intent);

    format!(
        "You are a helpful internship advisor chatbot. Your goal is to provide accurate, helpful information about internships.\n\
         \n\
         Current conversation context:\n\
         {context_lines}\n\
         \n\
         User's intent: {intent}\n\
         Confidence: {confidence}\n\
         \n\
         Relevant FAQ information:\n\
         {summary}\n\
         \n\
         Guidelines:\n\
         1. Be friendly, professional, and helpful\n\
         2. Provide specific, actionable advice when possible\n\
         3. If you don't know something, be honest and suggest alternatives\n\
         4. Keep responses concise but informative (2-3 sentences typically)\n\
         5. Use the FAQ information as a reference but don't just copy it verbatim\n\
         6. Maintain conversation flow and refer to previous context when relevant\n\
         \n\
         Respond naturally to the user's question about internships.",
        context_lines = context_lines,
        intent = classification.intent,
        confidence = classification.confidence,
        summary = summary,
    )
}

// =============================================================================
// Tests
// =============================================================================
