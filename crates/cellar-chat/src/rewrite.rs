//! Standalone query rewriting against conversation history

use std::sync::Arc;

use crate::error::Result;
use crate::generation::{strip_quotes, PromptBuilder};
use crate::providers::CompletionClient;
use crate::types::{ModelId, Turn};

/// Rewrites a follow-up question into a self-contained search query
///
/// Retrieval always operates on a single standalone query, no matter how
/// many prior turns the question implicitly references. The rewriter asks
/// the completion backend to resolve pronouns and ellipsis against the
/// history window and emit only the query itself.
pub struct QueryRewriter {
    completion: Arc<dyn CompletionClient>,
    model: ModelId,
    debug: bool,
}

impl QueryRewriter {
    /// Create a new rewriter
    pub fn new(completion: Arc<dyn CompletionClient>, model: ModelId, debug: bool) -> Self {
        Self {
            completion,
            model,
            debug,
        }
    }

    /// Rewrite `question` into a standalone query using the history window
    ///
    /// The raw completion is trimmed and quote-stripped before use. Errors
    /// from the completion backend propagate; the orchestrator decides the
    /// fallback.
    pub async fn rewrite(&self, window: &[Turn], question: &str) -> Result<String> {
        let history = PromptBuilder::render_history(window);
        let prompt = PromptBuilder::build_rewrite_prompt(&history, question);

        let raw = self.completion.complete(self.model, &prompt).await?;
        let query = strip_quotes(raw.trim());

        if self.debug {
            tracing::debug!(%query, "standalone query used to retrieve context");
        }

        Ok(query)
    }
}
