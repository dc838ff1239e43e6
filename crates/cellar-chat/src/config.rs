//! Configuration for the chat pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ModelId;

/// Main chat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Session behavior (history window, rewriting, debug)
    #[serde(default)]
    pub session: SessionConfig,
    /// Retrieval backend configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Completion backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl ChatConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ChatConfig = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration scalars before any external call is made
    pub fn validate(&self) -> Result<()> {
        if self.session.history_window_size < 1 {
            return Err(Error::Config(
                "history_window_size must be at least 1".to_string(),
            ));
        }
        if self.retrieval.context_k < 1 {
            return Err(Error::Config("context_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Per-session behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How many resolved turns the prompt window may carry
    #[serde(default = "default_history_window_size")]
    pub history_window_size: usize,
    /// Whether prior turns feed query rewriting and the prompt
    #[serde(default = "default_use_history")]
    pub use_history: bool,
    /// When true, the rewritten standalone query is logged
    #[serde(default)]
    pub debug: bool,
}

fn default_history_window_size() -> usize {
    7
}

fn default_use_history() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_window_size: 7,
            use_history: true,
            debug: false,
        }
    }
}

/// Retrieval backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Similarity search service base URL
    pub base_url: String,
    /// Number of passages retrieved per question
    #[serde(default = "default_context_k")]
    pub context_k: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_context_k() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6180".to_string(),
            context_k: 5,
            timeout_secs: 60,
        }
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Completion service base URL
    pub base_url: String,
    /// Active model, restricted to the supported whitelist
    #[serde(default)]
    pub model: ModelId,
    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.3
}

fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: ModelId::default(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}
