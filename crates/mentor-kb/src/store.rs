//! FAQ catalogue: loading, lookup, summaries, and best-effort search.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::KnowledgeError;
use crate::intent::Intent;

/// The built-in FAQ document, compiled into the crate.
const BUILTIN_FAQ: &str = include_str!("../data/faq.toml");

/// Generic capability statement returned when an intent has no catalogue entry.
const GENERIC_SUMMARY: &str =
    "I can help with questions about internship applications, requirements, timelines, compensation, and more!";

/// How many hits `search` returns at most.
const MAX_SEARCH_HITS: usize = 3;

// =============================================================================
// Document model
// =============================================================================

/// One catalogued intent with its question/answer groups.
///
/// Immutable after construction; owned exclusively by the [`KnowledgeBase`].
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    pub intent: Intent,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

/// A single search hit: the intent, the matched question, and its lead answer.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqHit {
    pub intent: Intent,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct FaqDocument {
    #[serde(default, rename = "entry")]
    entries: Vec<FaqEntry>,
}

// =============================================================================
// KnowledgeBase
// =============================================================================

/// Static mapping from intent to FAQ content.
///
/// Entries keep document order; `search` iterates them as declared, so the
/// earliest entries win ties. No mutation operations.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
}

impl KnowledgeBase {
    /// Build the knowledge base from the compiled-in FAQ document.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_FAQ).expect("built-in FAQ catalogue is valid")
    }

    /// Load a FAQ document from a TOML file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path)?;
        let kb = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            entries = kb.entries.len(),
            "FAQ catalogue loaded"
        );
        Ok(kb)
    }

    /// Parse and validate a FAQ document from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, KnowledgeError> {
        let doc: FaqDocument = toml::from_str(content)?;
        validate(&doc.entries)?;
        Ok(Self {
            entries: doc.entries,
        })
    }

    /// Number of catalogued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the catalogue entry for an intent.
    pub fn lookup(&self, intent: Intent) -> Option<&FaqEntry> {
        self.entries.iter().find(|e| e.intent == intent)
    }

    /// Short digest of an intent's content, used as grounding context for
    /// generation: the first two questions plus the first answer. Unknown
    /// intents get a generic capability statement.
    pub fn summarize(&self, intent: Intent) -> String {
        match self.lookup(intent) {
            Some(entry) => {
                let questions = entry
                    .questions
                    .iter()
                    .take(2)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Common questions: {}\n\nKey information: {}",
                    questions, entry.answers[0]
                )
            }
            None => GENERIC_SUMMARY.to_string(),
        }
    }

    /// Best-effort lookup of catalogued questions matching a free-text query.
    ///
    /// Splits the query on whitespace and matches tokens case-insensitively
    /// as substrings of each catalogued question, in document order. Returns
    /// at most three hits, first-match ranked; this is not a relevance
    /// ranking.
    pub fn search(&self, query: &str) -> Vec<FaqHit> {
        let query_lower = query.to_lowercase();
        let tokens: Vec<&str> = query_lower.split_whitespace().collect();

        let mut hits = Vec::new();
        for entry in &self.entries {
            for question in &entry.questions {
                let question_lower = question.to_lowercase();
                if tokens.iter().any(|t| question_lower.contains(t)) {
                    hits.push(FaqHit {
                        intent: entry.intent,
                        question: question.clone(),
                        answer: entry.answers[0].clone(),
                    });
                    if hits.len() == MAX_SEARCH_HITS {
                        return hits;
                    }
                }
            }
        }
        hits
    }
}

/// Validate catalogue invariants: no transient intents, no duplicates,
/// at least one question and one answer per entry.
fn validate(entries: &[FaqEntry]) -> Result<(), KnowledgeError> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.intent == Intent::Other {
            return Err(KnowledgeError::Invalid(
                "'other' is synthesized and cannot be catalogued".to_string(),
            ));
        }
        if entry.questions.is_empty() {
            return Err(KnowledgeError::Invalid(format!(
                "entry '{}' has no questions",
                entry.intent
            )));
        }
        if entry.answers.is_empty() {
            return Err(KnowledgeError::Invalid(format!(
                "entry '{}' has no answers",
                entry.intent
            )));
        }
        if entries[..i].iter().any(|e| e.intent == entry.intent) {
            return Err(KnowledgeError::Invalid(format!(
                "duplicate entry for intent '{}'",
                entry.intent
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
