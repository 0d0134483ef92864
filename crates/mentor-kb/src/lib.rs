//! Static FAQ knowledge base for the Mentor chatbot.
//!
//! Holds the intent taxonomy and the catalogued question/answer content,
//! loaded from a TOML document at startup. Read-only reference data.

pub mod error;
pub mod intent;
pub mod store;

pub use error::KnowledgeError;
pub use intent::Intent;
pub use store::{FaqEntry, FaqHit, KnowledgeBase};
