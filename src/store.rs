// src/store.rs

use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::AppError;
use crate::models::score::{
    ClassStat, QuestionStat, ScoreRecord, ScoreStats, SubmitRequest,
};

/// Outcome of an accepted submission.
#[derive(Debug)]
pub struct SubmitReceipt {
    pub record: ScoreRecord,
    pub submit_count: u32,
}

/// Exclusive claim on the score-file writer slot, held across a whole
/// read-modify-write.
pub struct WriteClaim<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// Flat-file score store: a single JSON array rewritten wholesale on every
/// mutation, with a snapshot copied to a backup path before each write.
///
/// Writers are serialized by a real mutex held across the whole
/// read-modify-write, but a contested writer fails fast (409) instead of
/// queueing, keeping the original service's observable contract. The main
/// file itself is replaced via write-to-temp + rename, so readers observe
/// writes wholly-before or wholly-after.
pub struct ScoreStore {
    path: PathBuf,
    backup_path: PathBuf,
    write_lock: Mutex<()>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl ScoreStore {
    /// Opens the store, creating an empty score file if none exists yet.
    pub fn new(
        path: impl Into<PathBuf>,
        backup_path: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let path = path.into();
        if !path.exists() {
            fs::write(&path, "[]")?;
        }
        Ok(Self {
            path,
            backup_path: backup_path.into(),
            write_lock: Mutex::new(()),
        })
    }

    /// Claims the single writer slot, failing fast with a 409 when another
    /// write is in flight. The claim is released on drop.
    pub fn claim_writer(&self) -> Result<WriteClaim<'_>, AppError> {
        let guard = self.write_lock.try_lock().map_err(|_| {
            AppError::Conflict("a score write is already in progress, try again".to_string())
        })?;
        Ok(WriteClaim { _guard: guard })
    }

    fn read_array(path: &Path) -> Result<Vec<ScoreRecord>, AppError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Reads the full score array. Never fails: a corrupt or unreadable main
    /// file falls back to the backup snapshot, and failing that, to an empty
    /// array.
    pub fn read_scores(&self) -> Vec<ScoreRecord> {
        match Self::read_array(&self.path) {
            Ok(scores) => scores,
            Err(err) => {
                tracing::warn!("Score file unreadable ({}), falling back to backup", err);
                Self::read_array(&self.backup_path).unwrap_or_default()
            }
        }
    }

    /// Persists the full array: snapshot the current file to the backup path,
    /// then atomically replace the main file. Caller must hold the write lock.
    fn persist(&self, scores: &[ScoreRecord]) -> Result<(), AppError> {
        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path)?;
        }
        let serialized = serde_json::to_string_pretty(scores)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Accepts or updates one student's submission.
    ///
    /// Validation reports every violated rule at once. A student number may
    /// submit at most 3 times; resubmission replaces the stored record in
    /// place, preserving the original `createdAt`.
    pub fn submit(&self, req: &SubmitRequest) -> Result<SubmitReceipt, AppError> {
        let errors = req.validation_errors();
        if !errors.is_empty() {
            return Err(AppError::BadRequest(errors.join("; ")));
        }

        let _claim = self.claim_writer()?;

        let mut scores = self.read_scores();
        let student_number = req.student_number.clone().unwrap_or_default();
        let now = Utc::now();

        let existing = scores
            .iter()
            .position(|s| s.student_number == student_number);

        let receipt = match existing {
            Some(idx) => {
                let prior = &scores[idx];
                if prior.submit_count >= 3 {
                    return Err(AppError::Forbidden(
                        "submission limit reached for this student number (max 3)".to_string(),
                    ));
                }
                let record = ScoreRecord {
                    submit_count: prior.submit_count + 1,
                    created_at: prior.created_at,
                    updated_at: Some(now),
                    ..Self::record_from_request(req, now)
                };
                scores[idx] = record.clone();
                let submit_count = record.submit_count;
                SubmitReceipt {
                    record,
                    submit_count,
                }
            }
            None => {
                let record = Self::record_from_request(req, now);
                scores.push(record.clone());
                SubmitReceipt {
                    record,
                    submit_count: 1,
                }
            }
        };

        self.persist(&scores)?;
        Ok(receipt)
    }

    // Field presence is guaranteed by `validation_errors`.
    fn record_from_request(req: &SubmitRequest, now: chrono::DateTime<Utc>) -> ScoreRecord {
        ScoreRecord {
            name: req.name.clone().unwrap_or_default(),
            class_name: req.class_name.clone().unwrap_or_default(),
            student_number: req.student_number.clone().unwrap_or_default(),
            score: req.score.unwrap_or_default(),
            correct_count: req.correct_count.unwrap_or_default() as u64,
            wrong_count: req.wrong_count.unwrap_or_default() as u64,
            unanswered_count: req.unanswered_count.unwrap_or_default() as u64,
            submit_count: 1,
            created_at: now,
            updated_at: None,
            answer_details: req.answer_details.clone(),
        }
    }

    pub fn list_all(&self) -> Vec<ScoreRecord> {
        self.read_scores()
    }

    pub fn get(&self, student_number: &str) -> Option<ScoreRecord> {
        self.read_scores()
            .into_iter()
            .find(|s| s.student_number == student_number)
    }

    /// Removes one student's record. Unknown student numbers are a 404.
    pub fn delete_one(&self, student_number: &str) -> Result<(), AppError> {
        let _claim = self.claim_writer()?;

        let scores = self.read_scores();
        let filtered: Vec<ScoreRecord> = scores
            .iter()
            .filter(|s| s.student_number != student_number)
            .cloned()
            .collect();

        if filtered.len() == scores.len() {
            return Err(AppError::NotFound(format!(
                "no score found for student number '{}'",
                student_number
            )));
        }

        self.persist(&filtered)
    }

    /// Clears every record (the pre-wipe state survives in the backup file).
    pub fn delete_all(&self) -> Result<(), AppError> {
        let _claim = self.claim_writer()?;
        self.persist(&[])
    }

    // avg, max, min, pass rate (percentage, pass mark 60) for one group.
    fn summarize(scores: &[f64]) -> (f64, f64, f64, f64) {
        if scores.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let total: f64 = scores.iter().sum();
        let max = scores.iter().cloned().fold(f64::MIN, f64::max);
        let min = scores.iter().cloned().fold(f64::MAX, f64::min);
        let passed = scores.iter().filter(|&&s| s >= 60.0).count();
        (
            round2(total / scores.len() as f64),
            max,
            min,
            round2(passed as f64 * 100.0 / scores.len() as f64),
        )
    }

    pub fn stats(&self) -> ScoreStats {
        let scores = self.read_scores();
        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        let (average_score, max_score, min_score, pass_rate) = Self::summarize(&values);
        ScoreStats {
            total_students: scores.len(),
            average_score,
            max_score,
            min_score,
            pass_rate,
        }
    }

    /// Wrong-rate per question over every submission that carried answer
    /// details, hardest questions first.
    pub fn question_stats(&self) -> Vec<QuestionStat> {
        let scores = self.read_scores();

        let mut by_question: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for record in &scores {
            let Some(details) = &record.answer_details else {
                continue;
            };
            for detail in details {
                let entry = by_question.entry(detail.question_id.clone()).or_default();
                entry.0 += 1;
                if !detail.correct {
                    entry.1 += 1;
                }
            }
        }

        let mut rows: Vec<QuestionStat> = by_question
            .into_iter()
            .map(|(question_id, (attempts, wrong_count))| QuestionStat {
                question_id,
                attempts,
                wrong_count,
                wrong_rate: round2(wrong_count as f64 * 100.0 / attempts as f64),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.wrong_rate
                .partial_cmp(&a.wrong_rate)
                .unwrap_or(Ordering::Equal)
        });
        rows
    }

    /// Per-class aggregates, sorted by class name.
    pub fn class_stats(&self) -> Vec<ClassStat> {
        let scores = self.read_scores();

        let mut by_class: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in &scores {
            by_class
                .entry(record.class_name.clone())
                .or_default()
                .push(record.score);
        }

        by_class
            .into_iter()
            .map(|(class_name, values)| {
                let (average_score, max_score, min_score, pass_rate) =
                    Self::summarize(&values);
                ClassStat {
                    class_name,
                    student_count: values.len(),
                    average_score,
                    max_score,
                    min_score,
                    pass_rate,
                }
            })
            .collect()
    }
}
