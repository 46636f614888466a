//! Rule documents and the validated, immutable [`RuleSet`] built from them.
//!
//! Two documents feed the planner: the question document (question to flag
//! rules, category weights, count-threshold triggers) and the decision
//! document (thresholds, narrative templates, qualifying-variant groups).
//! Both are parsed with serde and checked structurally before a `RuleSet`
//! exists, so a malformed document fails at load time instead of skewing a
//! recommendation later.

mod store;

pub use store::RuleStore;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerValue, CareCategory, ScoredCategory};
use super::evaluation::triggers::is_safety_trigger;

pub const QUESTION_DOCUMENT: &str = "questions.json";
pub const DECISION_DOCUMENT: &str = "decisions.json";

const REFERENCE_QUESTIONS: &str = include_str!("../../../rules/questions.json");
const REFERENCE_DECISIONS: &str = include_str!("../../../rules/decisions.json");

/// Condition tested against one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Equals(AnswerValue),
    OneOf(Vec<AnswerValue>),
    AtLeast(f64),
    AtMost(f64),
    Answered,
}

impl Predicate {
    pub fn holds(&self, answer: &AnswerValue) -> bool {
        match self {
            Predicate::Equals(expected) => answer.matches(expected),
            Predicate::OneOf(options) => options.iter().any(|option| answer.matches(option)),
            Predicate::AtLeast(minimum) => answer
                .as_number()
                .map(|value| value >= *minimum)
                .unwrap_or(false),
            Predicate::AtMost(maximum) => answer
                .as_number()
                .map(|value| value <= *maximum)
                .unwrap_or(false),
            Predicate::Answered => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagRule {
    pub when: Predicate,
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRules {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    pub rules: Vec<FlagRule>,
}

/// Fires when at least `minimum_count` of `flags` are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountTrigger {
    pub name: String,
    pub flags: BTreeSet<String>,
    pub minimum_count: usize,
}

/// Parsed form of `questions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub version: String,
    pub questions: Vec<QuestionRules>,
    pub weights: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub count_triggers: Vec<CountTrigger>,
}

/// Parsed form of `decisions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionDocument {
    pub version: String,
    pub thresholds: Thresholds,
    #[serde(default = "default_variant_priority")]
    pub variant_priority: Vec<NarrativeVariant>,
    #[serde(default)]
    pub variant_flags: BTreeMap<NarrativeVariant, BTreeSet<String>>,
    pub narratives: BTreeMap<String, BTreeMap<NarrativeVariant, String>>,
}

fn default_variant_priority() -> Vec<NarrativeVariant> {
    vec![
        NarrativeVariant::Financial,
        NarrativeVariant::Safety,
        NarrativeVariant::Mobility,
    ]
}

/// Minimum scores for the score-based rungs of the decision ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub assisted_living: f64,
    pub in_home: f64,
}

/// Template flavour within a category's narrative block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeVariant {
    Override,
    Financial,
    Safety,
    Mobility,
    Base,
}

impl NarrativeVariant {
    pub const fn is_qualifying(self) -> bool {
        matches!(
            self,
            NarrativeVariant::Financial | NarrativeVariant::Safety | NarrativeVariant::Mobility
        )
    }
}

/// Templates for one decision category. Always holds a `base` template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBlock {
    templates: BTreeMap<NarrativeVariant, String>,
}

impl NarrativeBlock {
    pub fn template(&self, variant: NarrativeVariant) -> Option<&str> {
        self.templates.get(&variant).map(String::as_str)
    }

    pub fn base(&self) -> &str {
        self.template(NarrativeVariant::Base).unwrap_or_default()
    }
}

/// Structural problems found while loading rule documents.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("failed to read rule document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rule document {document} is not valid JSON: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{document} is missing a version label")]
    MissingVersion { document: &'static str },
    #[error("question {0} is defined more than once")]
    DuplicateQuestion(String),
    #[error("question {0} has no flag rules")]
    QuestionWithoutRules(String),
    #[error("question {question} has a rule with an empty flag name")]
    EmptyFlagName { question: String },
    #[error("unknown category {0:?} in rule documents")]
    UnknownCategory(String),
    #[error("weight for {signal} in {category} must be finite")]
    NonFiniteWeight { category: String, signal: String },
    #[error("trigger {0} lists no flags")]
    EmptyTrigger(String),
    #[error("trigger {trigger} requires {minimum} of {available} flags")]
    InvalidMinimumCount {
        trigger: String,
        minimum: usize,
        available: usize,
    },
    #[error("trigger {0} is defined more than once")]
    DuplicateTrigger(String),
    #[error("trigger name {0} is reserved for a built-in safety rule")]
    ReservedTriggerName(String),
    #[error("{category} threshold must be a finite, non-negative number (found {value})")]
    InvalidThreshold { category: &'static str, value: f64 },
    #[error("no narrative block for {0}")]
    MissingNarrativeBlock(CareCategory),
    #[error("narrative block for {0} has no base template")]
    MissingBaseTemplate(CareCategory),
    #[error("variant {0:?} cannot appear in the qualifying priority list")]
    InvalidVariantPriority(NarrativeVariant),
}

/// Immutable, validated rule tables for one evaluation snapshot.
#[derive(Debug, Clone)]
pub struct RuleSet {
    version: String,
    loaded_at: DateTime<Utc>,
    questions: Vec<QuestionRules>,
    weights: BTreeMap<ScoredCategory, BTreeMap<String, f64>>,
    count_triggers: Vec<CountTrigger>,
    thresholds: Thresholds,
    variant_priority: Vec<NarrativeVariant>,
    variant_flags: BTreeMap<NarrativeVariant, BTreeSet<String>>,
    narratives: BTreeMap<CareCategory, NarrativeBlock>,
}

impl RuleSet {
    /// Validate both documents and freeze them into a rule set.
    pub fn from_documents(
        questions: QuestionDocument,
        decisions: DecisionDocument,
    ) -> Result<Self, RuleSetError> {
        if questions.version.trim().is_empty() {
            return Err(RuleSetError::MissingVersion {
                document: QUESTION_DOCUMENT,
            });
        }
        if decisions.version.trim().is_empty() {
            return Err(RuleSetError::MissingVersion {
                document: DECISION_DOCUMENT,
            });
        }

        let mut seen = BTreeSet::new();
        for question in &questions.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(RuleSetError::DuplicateQuestion(question.id.clone()));
            }
            if question.rules.is_empty() {
                return Err(RuleSetError::QuestionWithoutRules(question.id.clone()));
            }
            if question.rules.iter().any(|rule| rule.flag.trim().is_empty()) {
                return Err(RuleSetError::EmptyFlagName {
                    question: question.id.clone(),
                });
            }
        }

        let mut weights = BTreeMap::new();
        for (key, table) in questions.weights {
            let category =
                ScoredCategory::from_key(&key).ok_or(RuleSetError::UnknownCategory(key.clone()))?;
            if let Some((signal, _)) = table.iter().find(|(_, weight)| !weight.is_finite()) {
                return Err(RuleSetError::NonFiniteWeight {
                    category: key,
                    signal: signal.clone(),
                });
            }
            weights.insert(category, table);
        }

        let mut trigger_names = BTreeSet::new();
        for trigger in &questions.count_triggers {
            if is_safety_trigger(&trigger.name) {
                return Err(RuleSetError::ReservedTriggerName(trigger.name.clone()));
            }
            if !trigger_names.insert(trigger.name.as_str()) {
                return Err(RuleSetError::DuplicateTrigger(trigger.name.clone()));
            }
            if trigger.flags.is_empty() {
                return Err(RuleSetError::EmptyTrigger(trigger.name.clone()));
            }
            if trigger.minimum_count == 0 || trigger.minimum_count > trigger.flags.len() {
                return Err(RuleSetError::InvalidMinimumCount {
                    trigger: trigger.name.clone(),
                    minimum: trigger.minimum_count,
                    available: trigger.flags.len(),
                });
            }
        }

        validate_threshold("assisted_living", decisions.thresholds.assisted_living)?;
        validate_threshold("in_home", decisions.thresholds.in_home)?;

        if let Some(variant) = decisions
            .variant_priority
            .iter()
            .find(|variant| !variant.is_qualifying())
        {
            return Err(RuleSetError::InvalidVariantPriority(*variant));
        }

        let mut narratives = BTreeMap::new();
        for (key, templates) in decisions.narratives {
            let category =
                CareCategory::from_key(&key).ok_or(RuleSetError::UnknownCategory(key.clone()))?;
            narratives.insert(category, NarrativeBlock { templates });
        }
        for category in CareCategory::ALL {
            let block = narratives
                .get(&category)
                .ok_or(RuleSetError::MissingNarrativeBlock(category))?;
            if block.template(NarrativeVariant::Base).is_none() {
                return Err(RuleSetError::MissingBaseTemplate(category));
            }
        }

        Ok(Self {
            version: format!("{}+{}", questions.version, decisions.version),
            loaded_at: Utc::now(),
            questions: questions.questions,
            weights,
            count_triggers: questions.count_triggers,
            thresholds: decisions.thresholds,
            variant_priority: decisions.variant_priority,
            variant_flags: decisions.variant_flags,
            narratives,
        })
    }

    pub fn from_json(questions: &str, decisions: &str) -> Result<Self, RuleSetError> {
        let questions = serde_json::from_str(questions).map_err(|source| RuleSetError::Json {
            document: QUESTION_DOCUMENT,
            source,
        })?;
        let decisions = serde_json::from_str(decisions).map_err(|source| RuleSetError::Json {
            document: DECISION_DOCUMENT,
            source,
        })?;
        Self::from_documents(questions, decisions)
    }

    /// Load `questions.json` and `decisions.json` from a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let dir = dir.as_ref();
        let questions = read_document(&dir.join(QUESTION_DOCUMENT))?;
        let decisions = read_document(&dir.join(DECISION_DOCUMENT))?;
        Self::from_json(&questions, &decisions)
    }

    /// Rule set built from the documents shipped with the crate.
    pub fn reference() -> Result<Self, RuleSetError> {
        Self::from_json(REFERENCE_QUESTIONS, REFERENCE_DECISIONS)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn questions(&self) -> &[QuestionRules] {
        &self.questions
    }

    pub fn weights(&self, category: ScoredCategory) -> Option<&BTreeMap<String, f64>> {
        self.weights.get(&category)
    }

    pub fn count_triggers(&self) -> &[CountTrigger] {
        &self.count_triggers
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn variant_priority(&self) -> &[NarrativeVariant] {
        &self.variant_priority
    }

    pub fn variant_flags(&self, variant: NarrativeVariant) -> Option<&BTreeSet<String>> {
        self.variant_flags.get(&variant)
    }

    pub fn narrative_block(&self, category: CareCategory) -> &NarrativeBlock {
        // Presence of every block is checked in `from_documents`.
        &self.narratives[&category]
    }
}

fn validate_threshold(category: &'static str, value: f64) -> Result<(), RuleSetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RuleSetError::InvalidThreshold { category, value })
    }
}

fn read_document(path: &Path) -> Result<String, RuleSetError> {
    fs::read_to_string(path).map_err(|source| RuleSetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
