//! Supported completion models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Whitelist of completion models the backend accepts
///
/// Identifiers outside this set fail at the boundary; orchestration code
/// only ever sees a valid `ModelId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "snowflake-arctic")]
    SnowflakeArctic,
    #[serde(rename = "mistral-large")]
    MistralLarge,
    #[serde(rename = "mistral-7b")]
    Mistral7b,
    #[serde(rename = "mixtral-8x7b")]
    Mixtral8x7b,
    #[serde(rename = "llama3-70b")]
    Llama3_70b,
    #[serde(rename = "llama3-8b")]
    Llama3_8b,
    #[serde(rename = "llama2-70b-chat")]
    Llama2_70bChat,
    #[serde(rename = "reka-flash")]
    RekaFlash,
    #[serde(rename = "reka-core")]
    RekaCore,
    #[serde(rename = "gemma-7b")]
    Gemma7b,
}

impl ModelId {
    /// Wire name of the model
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::SnowflakeArctic => "snowflake-arctic",
            ModelId::MistralLarge => "mistral-large",
            ModelId::Mistral7b => "mistral-7b",
            ModelId::Mixtral8x7b => "mixtral-8x7b",
            ModelId::Llama3_70b => "llama3-70b",
            ModelId::Llama3_8b => "llama3-8b",
            ModelId::Llama2_70bChat => "llama2-70b-chat",
            ModelId::RekaFlash => "reka-flash",
            ModelId::RekaCore => "reka-core",
            ModelId::Gemma7b => "gemma-7b",
        }
    }

    /// All supported models, in selector order
    pub fn all() -> &'static [ModelId] {
        &[
            ModelId::SnowflakeArctic,
            ModelId::MistralLarge,
            ModelId::Mistral7b,
            ModelId::Mixtral8x7b,
            ModelId::Llama3_70b,
            ModelId::Llama3_8b,
            ModelId::Llama2_70bChat,
            ModelId::RekaFlash,
            ModelId::RekaCore,
            ModelId::Gemma7b,
        ]
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::SnowflakeArctic
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::all()
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnsupportedModel(s.to_string()))
    }
}
