//! Retrieved context assembly

use std::sync::Arc;

use crate::error::Result;
use crate::generation::strip_quotes;
use crate::providers::RetrievalClient;

/// Assembles a retrieved context block for a single query
///
/// Passages are concatenated in the order the retrieval backend returns
/// them (descending similarity), without separators and without truncating
/// any individual passage. Zero passages assemble to an empty string; the
/// prompt keeps its context region either way.
pub struct ContextAssembler {
    retrieval: Arc<dyn RetrievalClient>,
    context_k: usize,
}

impl ContextAssembler {
    /// Create a new assembler
    pub fn new(retrieval: Arc<dyn RetrievalClient>, context_k: usize) -> Self {
        Self {
            retrieval,
            context_k,
        }
    }

    /// Retrieve and concatenate up to `context_k` passages for `query`
    pub async fn assemble(&self, query: &str) -> Result<String> {
        let passages = self.retrieval.retrieve(query, self.context_k).await?;

        let mut context = String::new();
        for passage in passages.iter().take(self.context_k) {
            context.push_str(passage);
        }

        Ok(strip_quotes(&context))
    }
}
