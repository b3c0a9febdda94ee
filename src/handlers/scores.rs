// src/handlers/scores.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, models::score::SubmitRequest, store::ScoreStore};

/// Accepts a student's score submission. Open to anyone.
///
/// 400 with the aggregated rule violations, 403 once the student number has
/// used up its 3 submissions, 409 if another write is in flight.
pub async fn submit(
    State(store): State<Arc<ScoreStore>>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = store.submit(&payload)?;

    Ok(Json(json!({
        "success": true,
        "message": "score submitted successfully",
        "data": receipt.record,
        "submitCount": receipt.submit_count,
    })))
}

/// Lists every stored score. Admin only.
pub async fn list_scores(State(store): State<Arc<ScoreStore>>) -> impl IntoResponse {
    Json(store.list_all())
}

/// Deletes one student's score. Admin only.
pub async fn delete_score(
    State(store): State<Arc<ScoreStore>>,
    Path(student_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_one(&student_number)?;

    Ok(Json(json!({
        "success": true,
        "message": "score deleted",
    })))
}

/// Wipes the whole score file (a backup snapshot is taken first). Admin only.
pub async fn clear_scores(
    State(store): State<Arc<ScoreStore>>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_all()?;

    Ok(Json(json!({
        "success": true,
        "message": "all scores cleared",
    })))
}

/// Aggregate statistics over all submissions. Admin only.
pub async fn get_stats(State(store): State<Arc<ScoreStore>>) -> impl IntoResponse {
    Json(store.stats())
}

/// Per-question answer details for one student. Admin only.
pub async fn get_details(
    State(store): State<Arc<ScoreStore>>,
    Path(student_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = store.get(&student_number).ok_or_else(|| {
        AppError::NotFound(format!(
            "no score found for student number '{}'",
            student_number
        ))
    })?;

    let details = record.answer_details.ok_or_else(|| {
        AppError::NotFound("no answer details recorded for this student".to_string())
    })?;

    Ok(Json(json!({
        "studentNumber": record.student_number,
        "name": record.name,
        "className": record.class_name,
        "answerDetails": details,
    })))
}
