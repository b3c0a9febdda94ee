// tests/registry_tests.rs

use exam_backend::registry::{AnswerPair, QuestionRegistry, ValidationOutcome};
use serde_json::{Value, json};
use std::collections::HashSet;

fn sample_bank() -> Value {
    json!({
        "choiceQuestions": [
            { "question": "Q1", "options": ["A. x", "B. y"], "answer": "B" },
            { "question": "Q2", "options": ["A. x", "B. y", "C. z"], "answer": "A" },
            { "question": "Q3", "options": ["A. x", "B. y"], "answer": "A" }
        ],
        "judgeQuestions": [
            { "question": "J1", "answer": true },
            { "question": "J2", "answer": false }
        ]
    })
}

fn loaded_registry() -> QuestionRegistry {
    let mut registry = QuestionRegistry::new();
    registry.load(&sample_bank());
    registry
}

#[test]
fn count_is_consistent_and_views_are_disjoint() {
    let registry = loaded_registry();
    let count = registry.count();

    assert_eq!(count.total, 5);
    assert_eq!(count.choice, 3);
    assert_eq!(count.judge, 2);
    assert_eq!(count.total, count.choice + count.judge);

    let choice_ids: HashSet<&str> = registry
        .choice_questions()
        .iter()
        .map(|q| q.id())
        .collect();
    let judge_ids: HashSet<&str> = registry.judge_questions().iter().map(|q| q.id()).collect();
    assert!(choice_ids.is_disjoint(&judge_ids));
}

#[test]
fn ids_are_sequential_per_type() {
    let registry = loaded_registry();

    assert!(registry.get("choice_1").is_some());
    assert!(registry.get("choice_3").is_some());
    assert!(registry.get("judge_1").is_some());
    assert!(registry.get("judge_2").is_some());
    assert!(registry.get("choice_4").is_none());
    assert!(registry.get("judge_3").is_none());
}

#[test]
fn choice_validation_is_case_insensitive() {
    // Scenario: correctAnswer "B" must match "b" but not other keys
    let registry = loaded_registry();

    for (answer, expected) in [
        (json!("B"), true),
        (json!("b"), true),
        (json!("A"), false),
        (json!("C"), false),
        (json!("E"), false),
        (json!(""), false),
    ] {
        match registry.validate("choice_1", &answer) {
            ValidationOutcome::Checked { is_correct, .. } => {
                assert_eq!(is_correct, expected, "answer {:?}", answer)
            }
            ValidationOutcome::NotFound { .. } => panic!("choice_1 should exist"),
        }
    }
}

#[test]
fn judge_validation_requires_a_boolean_literal() {
    let registry = loaded_registry();

    // judge_1 has answer true: only a JSON boolean true may match
    for (answer, expected) in [
        (json!(true), true),
        (json!(false), false),
        (json!(1), false),
        (json!("true"), false),
        (json!(null), false),
    ] {
        match registry.validate("judge_1", &answer) {
            ValidationOutcome::Checked { is_correct, .. } => {
                assert_eq!(is_correct, expected, "answer {:?}", answer)
            }
            ValidationOutcome::NotFound { .. } => panic!("judge_1 should exist"),
        }
    }
}

#[test]
fn unknown_id_reports_not_found_without_error() {
    let registry = loaded_registry();

    match registry.validate("choice_99", &json!("A")) {
        ValidationOutcome::NotFound { success, .. } => assert!(!success),
        ValidationOutcome::Checked { .. } => panic!("choice_99 must not validate"),
    }
}

#[test]
fn batch_validation_preserves_input_order() {
    let registry = loaded_registry();

    let pairs: Vec<AnswerPair> = serde_json::from_value(json!([
        { "questionId": "judge_2", "userAnswer": false },
        { "questionId": "missing_1", "userAnswer": "A" },
        { "questionId": "choice_1", "answer": "b" }
    ]))
    .unwrap();

    let results = registry.validate_batch(&pairs);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].question_id, "judge_2");
    assert_eq!(results[1].question_id, "missing_1");
    assert_eq!(results[2].question_id, "choice_1");

    assert!(matches!(
        results[0].outcome,
        ValidationOutcome::Checked { is_correct: true, .. }
    ));
    assert!(matches!(
        results[1].outcome,
        ValidationOutcome::NotFound { .. }
    ));
    assert!(matches!(
        results[2].outcome,
        ValidationOutcome::Checked { is_correct: true, .. }
    ));
}

#[test]
fn sample_with_large_n_returns_full_pool_in_order() {
    let registry = loaded_registry();

    let all = registry.sample(100, "all");
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].id(), "choice_1");
    assert_eq!(all[4].id(), "judge_2");

    let choice = registry.sample(3, "choice");
    let ids: Vec<&str> = choice.iter().map(|q| q.id()).collect();
    assert_eq!(ids, ["choice_1", "choice_2", "choice_3"]);
}

#[test]
fn sample_with_small_n_returns_unique_elements_of_the_pool() {
    let registry = loaded_registry();

    for _ in 0..20 {
        let sampled = registry.sample(2, "choice");
        assert_eq!(sampled.len(), 2);

        let ids: HashSet<&str> = sampled.iter().map(|q| q.id()).collect();
        assert_eq!(ids.len(), 2, "sampled questions must be distinct");
        for id in ids {
            assert!(id.starts_with("choice_"), "unexpected id {}", id);
        }
    }
}

#[test]
fn sample_with_non_positive_n_is_empty() {
    let registry = loaded_registry();

    assert!(registry.sample(0, "all").is_empty());
    assert!(registry.sample(-3, "judge").is_empty());
}

#[test]
fn unrecognized_kind_falls_back_to_full_pool() {
    let registry = loaded_registry();
    assert_eq!(registry.sample(100, "essay").len(), 5);
}

#[test]
fn loading_missing_or_malformed_arrays_yields_empty_parts() {
    let mut registry = QuestionRegistry::new();

    registry.load(&json!({}));
    assert_eq!(registry.count().total, 0);

    registry.load(&json!({ "choiceQuestions": "not an array", "judgeQuestions": 42 }));
    assert_eq!(registry.count().total, 0);

    registry.load(&json!({ "choiceQuestions": [], "judgeQuestions": [] }));
    assert_eq!(registry.count().total, 0);
}

#[test]
fn malformed_entries_are_stored_permissively() {
    let mut registry = QuestionRegistry::new();

    registry.load(&json!({
        "choiceQuestions": [
            { "options": ["A. x"], "answer": "A" },
            { "question": "no options", "answer": "B" },
            { "question": "no answer", "options": ["A. x"] }
        ],
        "judgeQuestions": [
            { "answer": true },
            "not even an object"
        ]
    }));

    let count = registry.count();
    assert_eq!(count.choice, 3);
    assert_eq!(count.judge, 2);

    // A question without an answer key never grades as correct
    match registry.validate("choice_3", &json!("A")) {
        ValidationOutcome::Checked { is_correct, .. } => assert!(!is_correct),
        ValidationOutcome::NotFound { .. } => panic!("choice_3 should exist"),
    }
}

#[test]
fn load_clears_prior_state() {
    let mut registry = QuestionRegistry::new();
    registry.load(&sample_bank());
    assert_eq!(registry.count().total, 5);

    registry.load(&json!({
        "judgeQuestions": [{ "question": "only one", "answer": false }]
    }));

    let count = registry.count();
    assert_eq!(count.total, 1);
    assert_eq!(count.choice, 0);
    assert!(registry.get("choice_1").is_none());
}

#[test]
fn export_is_the_inverse_of_load() {
    let registry = loaded_registry();
    let exported = registry.export();

    assert_eq!(exported["choiceQuestions"].as_array().unwrap().len(), 3);
    assert_eq!(exported["judgeQuestions"].as_array().unwrap().len(), 2);
    assert_eq!(exported["choiceQuestions"][0]["question"], "Q1");
    assert_eq!(exported["choiceQuestions"][0]["answer"], "B");
    assert_eq!(exported["judgeQuestions"][1]["answer"], false);
    // Ids are positional and must not be persisted
    assert!(exported["choiceQuestions"][0].get("id").is_none());

    // Reloading the exported form rebuilds the same registry
    let mut reloaded = QuestionRegistry::new();
    reloaded.load(&exported);
    assert_eq!(reloaded.count(), registry.count());
}
