// src/registry.rs

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;

use crate::error::AppError;
use crate::models::question::{ChoiceQuestion, JudgeQuestion, Question, QuestionKind};

/// Cardinalities of the registry and its two per-kind views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionCount {
    pub total: usize,
    pub choice: usize,
    pub judge: usize,
}

/// One (question, answer) pair for batch validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPair {
    pub question_id: String,
    #[serde(default, alias = "answer")]
    pub user_answer: Value,
}

/// Result of checking a single answer. Unknown ids are reported as a value,
/// never as an error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ValidationOutcome {
    NotFound {
        success: bool,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Checked {
        success: bool,
        is_correct: bool,
        correct_answer: Value,
        question_info: Value,
    },
}

impl ValidationOutcome {
    fn not_found() -> Self {
        ValidationOutcome::NotFound {
            success: false,
            message: "question not found".to_string(),
        }
    }
}

/// A batch result row, annotated with the id it was produced for.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidationItem {
    pub question_id: String,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// In-memory question registry: an ordered id -> question mapping with
/// choice-only and judge-only views, rebuilt wholesale on every load.
///
/// Ids are `"choice_<n>"` / `"judge_<n>"`, 1-based per kind, assigned by load
/// order. The registry is read-only after startup (held behind an `Arc` in
/// the application state).
#[derive(Debug, Default)]
pub struct QuestionRegistry {
    questions: Vec<Question>,
    index: HashMap<String, usize>,
    choice_order: Vec<usize>,
    judge_order: Vec<usize>,
}

impl QuestionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the question asset file, then loads it.
    /// Only called at startup, so I/O and parse failures are real errors.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let raw: Value = serde_json::from_str(&data)?;

        let mut registry = Self::new();
        registry.load(&raw);
        tracing::info!("Loaded {} questions", registry.count().total);
        Ok(registry)
    }

    /// Rebuilds the registry from a raw JSON object.
    ///
    /// Missing or non-array `choiceQuestions` / `judgeQuestions` fields are
    /// treated as empty. Entry fields are pulled permissively: a malformed
    /// entry still becomes a question (with `None` fields) rather than an
    /// error. All prior state is cleared first.
    pub fn load(&mut self, raw: &Value) {
        self.questions.clear();
        self.index.clear();
        self.choice_order.clear();
        self.judge_order.clear();

        if let Some(entries) = raw.get("choiceQuestions").and_then(Value::as_array) {
            for (i, entry) in entries.iter().enumerate() {
                let question = ChoiceQuestion {
                    id: format!("choice_{}", i + 1),
                    question: entry
                        .get("question")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    options: entry.get("options").and_then(Value::as_array).map(|opts| {
                        opts.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    }),
                    answer: entry
                        .get("answer")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                };
                self.insert(Question::Choice(question));
            }
        }

        if let Some(entries) = raw.get("judgeQuestions").and_then(Value::as_array) {
            for (i, entry) in entries.iter().enumerate() {
                let question = JudgeQuestion {
                    id: format!("judge_{}", i + 1),
                    question: entry
                        .get("question")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    answer: entry.get("answer").and_then(Value::as_bool),
                };
                self.insert(Question::Judge(question));
            }
        }
    }

    fn insert(&mut self, question: Question) {
        let idx = self.questions.len();
        self.index.insert(question.id().to_string(), idx);
        match question.kind() {
            QuestionKind::Choice => self.choice_order.push(idx),
            QuestionKind::Judge => self.judge_order.push(idx),
        }
        self.questions.push(question);
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&idx| &self.questions[idx])
    }

    pub fn all(&self) -> Vec<&Question> {
        self.questions.iter().collect()
    }

    pub fn choice_questions(&self) -> Vec<&Question> {
        self.choice_order.iter().map(|&i| &self.questions[i]).collect()
    }

    pub fn judge_questions(&self) -> Vec<&Question> {
        self.judge_order.iter().map(|&i| &self.questions[i]).collect()
    }

    pub fn count(&self) -> QuestionCount {
        QuestionCount {
            total: self.questions.len(),
            choice: self.choice_order.len(),
            judge: self.judge_order.len(),
        }
    }

    /// Draws up to `n` distinct questions from the requested pool.
    ///
    /// `kind` is `"choice"`, `"judge"`, or anything else for the full pool.
    /// `n <= 0` yields an empty list; `n >= pool size` yields the whole pool
    /// in original order.
    pub fn sample(&self, n: i64, kind: &str) -> Vec<Question> {
        let pool = match kind {
            "choice" => self.choice_questions(),
            "judge" => self.judge_questions(),
            _ => self.all(),
        };

        if n <= 0 {
            return Vec::new();
        }
        if n as usize >= pool.len() {
            return pool.into_iter().cloned().collect();
        }

        let mut rng = rand::thread_rng();
        pool.choose_multiple(&mut rng, n as usize)
            .map(|q| (*q).clone())
            .collect()
    }

    /// Checks a single answer against the question's own grading rule.
    pub fn validate(&self, id: &str, user_answer: &Value) -> ValidationOutcome {
        let Some(question) = self.get(id) else {
            return ValidationOutcome::not_found();
        };

        ValidationOutcome::Checked {
            success: true,
            is_correct: question.check_answer(user_answer),
            correct_answer: question.correct_answer(),
            question_info: question.info(),
        }
    }

    /// Applies `validate` to each pair, preserving input order.
    pub fn validate_batch(&self, pairs: &[AnswerPair]) -> Vec<BatchValidationItem> {
        pairs
            .iter()
            .map(|pair| BatchValidationItem {
                question_id: pair.question_id.clone(),
                outcome: self.validate(&pair.question_id, &pair.user_answer),
            })
            .collect()
    }

    /// Inverse of `load`: the asset form, without the derived ids.
    pub fn export(&self) -> Value {
        let choice: Vec<Value> = self
            .choice_questions()
            .into_iter()
            .filter_map(|q| match q {
                Question::Choice(c) => Some(json!({
                    "question": c.question,
                    "options": c.options,
                    "answer": c.answer,
                })),
                Question::Judge(_) => None,
            })
            .collect();

        let judge: Vec<Value> = self
            .judge_questions()
            .into_iter()
            .filter_map(|q| match q {
                Question::Judge(j) => Some(json!({
                    "question": j.question,
                    "answer": j.answer,
                })),
                Question::Choice(_) => None,
            })
            .collect();

        json!({
            "choiceQuestions": choice,
            "judgeQuestions": judge,
        })
    }
}
