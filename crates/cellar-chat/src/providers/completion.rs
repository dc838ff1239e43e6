//! Completion client trait for LLM answer generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ModelId;

/// Trait for single-shot LLM completion
///
/// Stateless: one prompt in, one completion out. Conversation memory lives
/// entirely in the prompt the caller assembles.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete a prompt with the given model
    async fn complete(&self, model: ModelId, prompt: &str) -> Result<String>;

    /// Check if the backend is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get client name for logging
    fn name(&self) -> &str;
}
