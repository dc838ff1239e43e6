//! Chat endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::Turn;

/// Request for the chat endpoint
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The question to answer
    pub question: String,
}

/// Response from the chat endpoint
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The grounded answer
    pub answer: String,
    /// Model that produced it
    pub model: String,
    /// Turns recorded after this exchange
    pub turn_count: usize,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// POST /api/chat - answer one question
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();

    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::Config("question must not be empty".to_string()));
    }

    let session = state.session().lock().await;
    let answer = session.ask(question).await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!("Chat turn completed in {}ms", processing_time_ms);

    Ok(Json(ChatResponse {
        answer,
        model: session.model().to_string(),
        turn_count: session.turn_count(),
        processing_time_ms,
    }))
}

/// Response from the reset endpoint
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub cleared: bool,
    pub turn_count: usize,
}

/// POST /api/reset - start the conversation over
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    let session = state.session().lock().await;
    session.reset();

    Ok(Json(ResetResponse {
        cleared: true,
        turn_count: session.turn_count(),
    }))
}

/// Response from the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<Turn>,
    pub count: usize,
}

/// GET /api/history - recorded conversation turns
pub async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>> {
    let session = state.session().lock().await;
    let turns = session.turns();
    let count = turns.len();

    Ok(Json(HistoryResponse { turns, count }))
}

/// Response from the models endpoint
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub active: String,
}

/// GET /api/models - supported completion models
pub async fn models(State(state): State<AppState>) -> Result<Json<ModelsResponse>> {
    let session = state.session().lock().await;

    Ok(Json(ModelsResponse {
        models: crate::types::ModelId::all()
            .iter()
            .map(|m| m.to_string())
            .collect(),
        active: session.model().to_string(),
    }))
}
