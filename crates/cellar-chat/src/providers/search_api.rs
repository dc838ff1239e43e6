//! HTTP client for the external similarity search service

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};

use super::retrieval::RetrievalClient;

/// Retrieval client for a vector search HTTP service
///
/// The service embeds the query itself and answers with passages ranked by
/// descending cosine similarity. This client never sees vectors.
pub struct SearchApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SearchRequest {
    query: String,
    top_k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    passages: Vec<Passage>,
}

#[derive(Deserialize)]
struct Passage {
    text: String,
    #[serde(default)]
    #[allow(dead_code)]
    similarity: f32,
}

impl SearchApiClient {
    /// Create a new search client
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Retrieval(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl RetrievalClient for SearchApiClient {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let url = format!("{}/api/search", self.base_url);

        let request = SearchRequest {
            query: query.to_string(),
            top_k: k,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Retrieval(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Retrieval(format!(
                "Search failed: HTTP {} - {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(format!("Failed to parse search response: {}", e)))?;

        if search_response.passages.len() > k {
            return Err(Error::Retrieval(format!(
                "Search returned {} passages for top_k={}",
                search_response.passages.len(),
                k
            )));
        }

        Ok(search_response
            .passages
            .into_iter()
            .map(|p| p.text)
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "search-api"
    }
}
