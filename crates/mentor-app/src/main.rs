//! Mentor application binary - composition root.
//!
//! Ties together all Mentor crates into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Load the FAQ catalogue (file from config, or the built-in one)
//! 3. Build the language-model client if an API key is available
//! 4. Assemble the chatbot pipeline and shared state
//! 5. Start the axum HTTP server
//!
//! The service is fully functional with no API key: classification and
//! response synthesis then run on their deterministic offline paths.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use mentor_api::{routes, AppState};
use mentor_chat::{Chatbot, LanguageModel, OpenAiClient};
use mentor_core::config::MentorConfig;
use mentor_kb::KnowledgeBase;

mod cli;

use cli::CliArgs;

/// Build the remote model client, or `None` when disabled or unconfigured.
fn build_model(config: &MentorConfig, offline: bool) -> Option<Arc<dyn LanguageModel>> {
    if offline || !config.llm.enabled {
        tracing::info!("Remote model disabled; running on offline paths only");
        return None;
    }
    match OpenAiClient::from_config(&config.llm) {
        Ok(client) => {
            tracing::info!(model = %client.model(), "Language model client ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Language model unavailable; running on offline paths only");
            None
        }
    }
}

/// Load the FAQ catalogue from the configured path, or fall back to the
/// built-in document.
fn load_knowledge(config: &MentorConfig) -> Arc<KnowledgeBase> {
    if let Some(ref path) = config.knowledge.path {
        match KnowledgeBase::load(Path::new(path)) {
            Ok(kb) => return Arc::new(kb),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path,
                    "Failed to load FAQ catalogue; using the built-in one"
                );
            }
        }
    }
    Arc::new(KnowledgeBase::builtin())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MentorConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);
    if let Some(ref path) = args.knowledge {
        config.knowledge.path = Some(path.to_string_lossy().to_string());
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Mentor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Knowledge base.
    let knowledge = load_knowledge(&config);
    tracing::info!(entries = knowledge.len(), "FAQ catalogue ready");

    // Language model (optional).
    let model = build_model(&config, args.offline);

    // Pipeline and shared state.
    let chatbot = Chatbot::new(config.chat.clone(), knowledge, model);
    let state = AppState::new(config, chatbot);

    tracing::info!(
        "Chat page at http://127.0.0.1:{}/",
        state.config.general.port
    );

    routes::start_server(state).await?;

    Ok(())
}
