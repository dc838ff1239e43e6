//! Chat server binary
//!
//! Run with: cargo run -p cellar-chat --bin cellar-chat-server

use cellar_chat::{config::ChatConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cellar_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration: file path from env, defaults otherwise
    let config = match std::env::var("CELLAR_CHAT_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            ChatConfig::from_file(&path)?
        }
        Err(_) => {
            tracing::info!("No config file set, using defaults");
            ChatConfig::default()
        }
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - History window: {}", config.session.history_window_size);
    tracing::info!("  - Use history: {}", config.session.use_history);
    tracing::info!("  - Context passages: {}", config.retrieval.context_k);

    // Probe the completion backend
    tracing::info!("Checking completion backend at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Completion backend is running");
        }
        _ => {
            tracing::warn!("Completion backend not available at {}", config.llm.base_url);
            tracing::warn!("Start it before asking questions, e.g. `ollama serve`");
        }
    }

    // Probe the retrieval backend
    match client
        .get(format!("{}/health", config.retrieval.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Retrieval backend is running");
        }
        _ => {
            tracing::warn!(
                "Retrieval backend not available at {}",
                config.retrieval.base_url
            );
        }
    }

    let server = ChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/chat    - Ask a question");
    println!("  POST /api/reset   - Start over");
    println!("  GET  /api/history - Conversation so far");
    println!("  GET  /api/models  - Supported models");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
