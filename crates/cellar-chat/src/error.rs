//! Error types for the chat pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chat pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model identifier outside the supported whitelist
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Retrieval backend error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Completion backend error
    #[error("Completion error: {0}")]
    Completion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a completion error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::UnsupportedModel(name) => (
                StatusCode::BAD_REQUEST,
                "unsupported_model",
                format!("Unsupported model: {}", name),
            ),
            Error::Retrieval(msg) => (StatusCode::BAD_GATEWAY, "retrieval_error", msg.clone()),
            Error::Completion(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "completion_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
