use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flag raised when memory decline is severe.
pub const SEVERE_COGNITIVE_RISK: &str = "severe_cognitive_risk";
/// Flag raised when nobody can provide supervision.
pub const NO_SUPPORT: &str = "no_support";
/// Safety trigger forcing a memory care decision.
pub const MEMORY_CARE_REQUIRED: &str = "memory_care_required";

/// Raw answer captured by the questionnaire. Choice answers arrive as the
/// 1-based option number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Numeric view of the answer; numeric text is accepted so `"2"` and `2`
    /// compare equal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(text) => text.trim().parse::<f64>().ok(),
            AnswerValue::Bool(_) => None,
        }
    }

    pub fn matches(&self, expected: &AnswerValue) -> bool {
        match (self, expected) {
            (AnswerValue::Bool(left), AnswerValue::Bool(right)) => left == right,
            (AnswerValue::Text(left), AnswerValue::Text(right)) => {
                left.trim().eq_ignore_ascii_case(right.trim())
            }
            _ => match (self.as_number(), expected.as_number()) {
                (Some(left), Some(right)) => (left - right).abs() < f64::EPSILON,
                _ => false,
            },
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<i32> for AnswerValue {
    fn from(value: i32) -> Self {
        AnswerValue::Number(value as f64)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

/// Answers keyed by question id. Unanswered questions are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.0.insert(question_id.into(), value.into());
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Named facts derived from answers. Membership is all that matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeSet<String>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        self.0.insert(flag.into())
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn contains_all<'a>(&self, flags: impl IntoIterator<Item = &'a str>) -> bool {
        flags.into_iter().all(|flag| self.contains(flag))
    }

    pub fn count_present<'a>(&self, flags: impl IntoIterator<Item = &'a String>) -> usize {
        flags.into_iter().filter(|flag| self.contains(flag)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Derived triggers fired during one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerSet(BTreeSet<String>);

impl TriggerSet {
    pub fn fire(&mut self, trigger: impl Into<String>) {
        self.0.insert(trigger.into());
    }

    pub fn fired(&self, trigger: &str) -> bool {
        self.0.contains(trigger)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TriggerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Closed set of recommendation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareCategory {
    MemoryCare,
    AssistedLiving,
    InHome,
    NoCareNeeded,
}

impl CareCategory {
    pub const ALL: [CareCategory; 4] = [
        CareCategory::MemoryCare,
        CareCategory::AssistedLiving,
        CareCategory::InHome,
        CareCategory::NoCareNeeded,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            CareCategory::MemoryCare => "memory_care",
            CareCategory::AssistedLiving => "assisted_living",
            CareCategory::InHome => "in_home",
            CareCategory::NoCareNeeded => "no_care_needed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CareCategory::MemoryCare => "Memory Care",
            CareCategory::AssistedLiving => "Assisted Living",
            CareCategory::InHome => "In-Home Care",
            CareCategory::NoCareNeeded => "No Care Needed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for CareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Categories that carry a weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredCategory {
    AssistedLiving,
    InHome,
}

impl ScoredCategory {
    pub const ALL: [ScoredCategory; 2] = [ScoredCategory::AssistedLiving, ScoredCategory::InHome];

    pub const fn key(self) -> &'static str {
        match self {
            ScoredCategory::AssistedLiving => "assisted_living",
            ScoredCategory::InHome => "in_home",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl From<ScoredCategory> for CareCategory {
    fn from(value: ScoredCategory) -> Self {
        match value {
            ScoredCategory::AssistedLiving => CareCategory::AssistedLiving,
            ScoredCategory::InHome => CareCategory::InHome,
        }
    }
}

/// Whether a score contribution came from an answer flag or a derived trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Flag,
    Trigger,
}

/// One weighted contribution, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub category: ScoredCategory,
    pub signal: String,
    pub source: SignalSource,
    pub weight: f64,
}

/// Per-category totals for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub totals: BTreeMap<ScoredCategory, f64>,
    pub components: Vec<ScoreComponent>,
}

impl CategoryScores {
    /// Scores with every category present at zero.
    pub fn zeroed() -> Self {
        Self {
            totals: ScoredCategory::ALL
                .into_iter()
                .map(|category| (category, 0.0))
                .collect(),
            components: Vec::new(),
        }
    }

    /// Build from bare totals, e.g. when replaying a stored evaluation.
    pub fn from_totals(assisted_living: f64, in_home: f64) -> Self {
        let mut scores = Self::zeroed();
        scores
            .totals
            .insert(ScoredCategory::AssistedLiving, assisted_living);
        scores.totals.insert(ScoredCategory::InHome, in_home);
        scores
    }

    pub fn get(&self, category: ScoredCategory) -> f64 {
        self.totals.get(&category).copied().unwrap_or(0.0)
    }

    /// Flags that raised the given category's score.
    pub fn supporting_flags(&self, category: ScoredCategory) -> BTreeSet<String> {
        self.components
            .iter()
            .filter(|component| {
                component.category == category
                    && component.source == SignalSource::Flag
                    && component.weight > 0.0
            })
            .map(|component| component.signal.clone())
            .collect()
    }
}

/// Ladder rung that produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    SafetyOverride,
    AssistedLivingThreshold,
    InHomeThreshold,
    Fallback,
}

/// Exactly one outcome per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub category: CareCategory,
    pub basis: DecisionBasis,
    pub qualifying_flags: BTreeSet<String>,
}

impl FinalDecision {
    pub fn is_safety_override(&self) -> bool {
        self.basis == DecisionBasis::SafetyOverride
    }

    pub fn summary(&self) -> String {
        let reason = match self.basis {
            DecisionBasis::SafetyOverride => "safety override",
            DecisionBasis::AssistedLivingThreshold => "assisted living threshold met",
            DecisionBasis::InHomeThreshold => "in-home threshold met",
            DecisionBasis::Fallback => "no threshold met",
        };

        if self.qualifying_flags.is_empty() {
            format!("{} ({reason})", self.category.label())
        } else {
            let flags: Vec<&str> = self.qualifying_flags.iter().map(String::as_str).collect();
            format!(
                "{} ({reason}: {})",
                self.category.label(),
                flags.join(", ")
            )
        }
    }
}
