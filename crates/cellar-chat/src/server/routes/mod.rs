//! API routes for the chat server

pub mod chat;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/reset", post(chat::reset))
        .route("/history", get(chat::history))
        .route("/models", get(chat::models))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "cellar-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Conversational RAG assistant with history-aware retrieval",
        "endpoints": {
            "POST /api/chat": "Ask a question, get a grounded answer",
            "POST /api/reset": "Start the conversation over",
            "GET /api/history": "Recorded conversation turns",
            "GET /api/models": "Supported completion models",
        }
    }))
}
