// src/handlers/analysis.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::store::ScoreStore;

/// Wrong-rate per question across all submitted answer details, hardest
/// first. Admin only.
pub async fn question_stats(State(store): State<Arc<ScoreStore>>) -> impl IntoResponse {
    Json(store.question_stats())
}

/// Per-class score aggregates. Admin only.
pub async fn class_stats(State(store): State<Arc<ScoreStore>>) -> impl IntoResponse {
    Json(store.class_stats())
}
