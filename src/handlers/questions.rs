// src/handlers/questions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    models::question::Question,
    registry::{AnswerPair, QuestionRegistry},
};

#[derive(Debug, Deserialize)]
pub struct SampleParams {
    /// When present, a random sample of this size is returned instead of the
    /// full asset.
    pub count: Option<i64>,
    /// 'choice', 'judge', or anything else for the combined pool.
    pub kind: Option<String>,
}

/// Serves the question asset, or a random sample of it.
pub async fn get_questions(
    State(registry): State<Arc<QuestionRegistry>>,
    Query(params): Query<SampleParams>,
) -> impl IntoResponse {
    match params.count {
        Some(count) => {
            let kind = params.kind.as_deref().unwrap_or("all");
            let sampled: Vec<Value> = registry
                .sample(count, kind)
                .iter()
                .map(Question::info)
                .collect();
            Json(Value::Array(sampled))
        }
        None => Json(registry.export()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub answers: Vec<AnswerPair>,
}

/// Checks a batch of answers against the registry, one result per input pair,
/// input order preserved. Unknown ids yield a not-found row, not an error.
pub async fn validate_answers(
    State(registry): State<Arc<QuestionRegistry>>,
    Json(payload): Json<ValidateRequest>,
) -> impl IntoResponse {
    Json(registry.validate_batch(&payload.answers))
}
