//! JSON query endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::Citation;

/// Body of `POST /api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Overrides the configured number of retrieved chunks
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Answer with its sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Citation>,
    pub chunks_retrieved: usize,
    pub processing_time_ms: u64,
}

/// POST /api/query - Answer a question
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let pipeline = state.pipeline();

    let answer = match request.top_k {
        Some(k) => pipeline.answer_question_top(&request.question, k).await?,
        None => pipeline.answer_question(&request.question).await?,
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Query completed in {}ms, {} sources",
        processing_time_ms,
        answer.sources.len()
    );

    Ok(Json(QueryResponse {
        sources: answer.citations(),
        chunks_retrieved: answer.sources.len(),
        answer: answer.text,
        processing_time_ms,
    }))
}
