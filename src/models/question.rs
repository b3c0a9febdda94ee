// src/models/question.rs

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Question type: 'choice' (multiple choice) or 'judge' (true/false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Choice,
    Judge,
}

/// A multiple-choice question.
///
/// Everything but `id` is optional: the loader is deliberately permissive and
/// stores entries with missing fields as-is (they serialize back as `null`
/// and never grade as correct) instead of rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub id: String,
    pub question: Option<String>,
    /// Ordered options, typically prefixed "A. ", "B. ", ...
    pub options: Option<Vec<String>>,
    /// Correct answer key, e.g. "B".
    pub answer: Option<String>,
}

impl ChoiceQuestion {
    /// Grading rule: case-insensitive comparison against the answer key.
    /// Non-string input never matches.
    pub fn check_answer(&self, user_answer: &Value) -> bool {
        match (user_answer.as_str(), self.answer.as_deref()) {
            (Some(given), Some(correct)) => given.eq_ignore_ascii_case(correct),
            _ => false,
        }
    }
}

/// A true/false question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeQuestion {
    pub id: String,
    pub question: Option<String>,
    pub answer: Option<bool>,
}

impl JudgeQuestion {
    /// Grading rule: strict boolean identity. Only a JSON `true`/`false`
    /// literal can match; `1`, `"true"`, `null` etc. all fail.
    pub fn check_answer(&self, user_answer: &Value) -> bool {
        match (user_answer.as_bool(), self.answer) {
            (Some(given), Some(correct)) => given == correct,
            _ => false,
        }
    }
}

/// A question of either kind, as held by the registry.
#[derive(Debug, Clone)]
pub enum Question {
    Choice(ChoiceQuestion),
    Judge(JudgeQuestion),
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::Choice(q) => &q.id,
            Question::Judge(q) => &q.id,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Choice(_) => QuestionKind::Choice,
            Question::Judge(_) => QuestionKind::Judge,
        }
    }

    pub fn check_answer(&self, user_answer: &Value) -> bool {
        match self {
            Question::Choice(q) => q.check_answer(user_answer),
            Question::Judge(q) => q.check_answer(user_answer),
        }
    }

    /// The correct answer as a JSON value (string for choice, bool for judge,
    /// `null` when the loaded entry had none).
    pub fn correct_answer(&self) -> Value {
        match self {
            Question::Choice(q) => json!(q.answer),
            Question::Judge(q) => json!(q.answer),
        }
    }

    /// Full question info as sent to clients, including the answer key
    /// (grading happens client-side, the asset is not secret).
    pub fn info(&self) -> Value {
        match self {
            Question::Choice(q) => json!({
                "id": q.id,
                "question": q.question,
                "type": QuestionKind::Choice,
                "options": q.options,
                "correctAnswer": q.answer,
            }),
            Question::Judge(q) => json!({
                "id": q.id,
                "question": q.question,
                "type": QuestionKind::Judge,
                "correctAnswer": q.answer,
            }),
        }
    }
}
