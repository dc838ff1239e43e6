//! Application state for the chat server

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::providers::{
    CompletionClient, OllamaCompletion, RetrievalClient, SearchApiClient,
};
use crate::session::ChatSession;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// The served conversation, one turn at a time
    session: Mutex<ChatSession>,
    /// Retrieval backend
    retrieval: Arc<dyn RetrievalClient>,
    /// Completion backend
    completion: Arc<dyn CompletionClient>,
}

impl AppState {
    /// Create new application state
    ///
    /// Builds the concrete backends and one chat session over them. The
    /// session sits behind an async mutex: the hosting environment owns
    /// session identity, and this server serves one conversation at a time.
    pub fn new(config: ChatConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing chat application state...");

        let retrieval: Arc<dyn RetrievalClient> =
            Arc::new(SearchApiClient::new(&config.retrieval)?);
        tracing::info!("Retrieval client initialized ({})", retrieval.name());

        let completion: Arc<dyn CompletionClient> = Arc::new(OllamaCompletion::new(&config.llm)?);
        tracing::info!(
            "Completion client initialized ({}, model {})",
            completion.name(),
            config.llm.model
        );

        let session = ChatSession::new(&config, Arc::clone(&retrieval), Arc::clone(&completion))?;
        tracing::info!(session = %session.id(), "Chat session ready");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Mutex::new(session),
                retrieval,
                completion,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Get the served session
    pub fn session(&self) -> &Mutex<ChatSession> {
        &self.inner.session
    }

    /// Whether both backends currently answer health probes
    pub async fn backends_healthy(&self) -> bool {
        let retrieval_ok = self
            .inner
            .retrieval
            .health_check()
            .await
            .unwrap_or(false);
        let completion_ok = self
            .inner
            .completion
            .health_check()
            .await
            .unwrap_or(false);
        retrieval_ok && completion_ok
    }
}
