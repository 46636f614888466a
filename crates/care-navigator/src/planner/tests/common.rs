use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::planner::domain::{AnswerSet, FlagSet};
use crate::planner::evaluation::DecisionEngine;
use crate::planner::rules::{DecisionDocument, QuestionDocument, RuleSet};

pub(super) const QUESTIONS: &str = include_str!("../../../rules/questions.json");
pub(super) const DECISIONS: &str = include_str!("../../../rules/decisions.json");

pub(super) fn reference_rules() -> Arc<RuleSet> {
    Arc::new(RuleSet::reference().expect("reference rules load"))
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::new(reference_rules())
}

pub(super) fn question_document() -> QuestionDocument {
    serde_json::from_str(QUESTIONS).expect("question document parses")
}

pub(super) fn decision_document() -> DecisionDocument {
    serde_json::from_str(DECISIONS).expect("decision document parses")
}

pub(super) fn flags(names: &[&str]) -> FlagSet {
    names.iter().copied().collect()
}

/// Severe memory decline with nobody available: the memory care case.
pub(super) fn unsupervised_decline_answers() -> AnswerSet {
    AnswerSet::new().with("q4", 4).with("q5", 4)
}

/// Moderate needs across the board, with a mobility aid.
/// Assisted living scores 4, in-home scores 5.
pub(super) fn moderate_mobility_answers() -> AnswerSet {
    AnswerSet::new()
        .with("q1", 2)
        .with("q2", 2)
        .with("q4", 2)
        .with("q5", 3)
}

/// Heavy daily dependence, isolation and remote location.
pub(super) fn high_dependence_answers() -> AnswerSet {
    AnswerSet::new()
        .with("q1", 3)
        .with("q3", 3)
        .with("q7", 3)
        .with("q8", 1)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
