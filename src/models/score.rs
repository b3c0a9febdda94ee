// src/models/score.rs

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Per-question correctness entry attached to a submission.
/// Only consumed by the reporting/analysis endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub question_id: String,
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<Value>,
}

/// One student's persisted result, keyed logically by `studentNumber`.
/// Stored on disk as an element of a flat JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub name: String,
    pub class_name: String,
    pub student_number: String,
    pub score: f64,
    pub correct_count: u64,
    pub wrong_count: u64,
    pub unanswered_count: u64,
    /// Starts at 1, increments on resubmission, capped at 3.
    #[serde(default = "default_submit_count")]
    pub submit_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_details: Option<Vec<AnswerDetail>>,
}

// Score files written before the submit cap existed lack the field.
fn default_submit_count() -> u32 {
    1
}

/// Wrong-typed fields degrade to `None` instead of failing the whole
/// payload at the deserializer, so they surface through the aggregate
/// validator alongside every other violation.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Incoming submission payload. Fields are optional so that a missing or
/// wrong-typed field surfaces as an itemized validation message instead of a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub student_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub correct_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub wrong_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unanswered_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub answer_details: Option<Vec<AnswerDetail>>,
}

fn student_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-zA-Z0-9]+$").expect("student number pattern"))
}

impl SubmitRequest {
    /// Checks every rule and returns all violations, not just the first.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let is_blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());

        if is_blank(&self.name) {
            errors.push("name must not be empty".to_string());
        }
        if is_blank(&self.class_name) {
            errors.push("className must not be empty".to_string());
        }
        if is_blank(&self.student_number) {
            errors.push("studentNumber must not be empty".to_string());
        }
        if let Some(number) = self.student_number.as_deref() {
            if !number.is_empty() && !student_number_re().is_match(number) {
                errors.push("studentNumber may only contain letters and digits".to_string());
            }
        }

        match self.score {
            Some(s) if (0.0..=100.0).contains(&s) => {}
            _ => errors.push("score must be a number between 0 and 100".to_string()),
        }

        // unansweredCount defaults to 0 when omitted; the others are required.
        if !matches!(self.correct_count, Some(n) if n >= 0) {
            errors.push("correctCount must be a non-negative number".to_string());
        }
        if !matches!(self.wrong_count, Some(n) if n >= 0) {
            errors.push("wrongCount must be a non-negative number".to_string());
        }
        if self.unanswered_count.unwrap_or(0) < 0 {
            errors.push("unansweredCount must be a non-negative number".to_string());
        }

        errors
    }
}

/// Aggregate statistics over the whole score file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    pub total_students: usize,
    pub average_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    /// Percentage of students with score >= 60, rounded to two decimals.
    pub pass_rate: f64,
}

/// Per-question wrong-rate row derived from submitted answer details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    pub question_id: String,
    pub attempts: usize,
    pub wrong_count: usize,
    pub wrong_rate: f64,
}

/// Per-class aggregate row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStat {
    pub class_name: String,
    pub student_count: usize,
    pub average_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub pass_rate: f64,
}
