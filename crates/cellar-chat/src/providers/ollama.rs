//! Ollama-backed completion client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::ModelId;

use super::completion::CompletionClient;

/// Completion client for a local or remote Ollama server
///
/// Non-streaming: one generate call per completion. No automatic retries;
/// a failed call is reported once to the caller.
pub struct OllamaCompletion {
    client: Client,
    base_url: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaCompletion {
    /// Create a new completion client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Completion(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OllamaCompletion {
    async fn complete(&self, model: ModelId, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: model.as_str().to_string(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("Failed to parse generation response: {}", e)))?;

        Ok(generate_response.response)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
