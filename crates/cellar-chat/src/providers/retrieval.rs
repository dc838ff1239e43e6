//! Retrieval client trait for similarity search

use async_trait::async_trait;

use crate::error::Result;

/// Trait for retrieving reference passages by semantic similarity
///
/// One call, one ranked result set; there are no partial results. Passages
/// come back ordered by descending similarity, never more than `k` of them.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Retrieve up to `k` passages relevant to `query`
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>>;

    /// Check if the backend is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get client name for logging
    fn name(&self) -> &str;
}
