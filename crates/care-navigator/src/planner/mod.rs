//! Care pathway recommendation: answers become flags, flags become category
//! scores and derived triggers, and a fixed decision ladder turns those into
//! exactly one recommendation with a rendered explanation.

pub mod domain;
pub mod evaluation;
pub mod narrative;
pub mod router;
pub mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerSet, AnswerValue, CareCategory, CategoryScores, DecisionBasis, FinalDecision, FlagSet,
    ScoreComponent, ScoredCategory, SignalSource, TriggerSet,
};
pub use evaluation::{
    aggregate_scores, decide_outcome, dependence_override, derive_triggers, extract_flags,
    safety_override, DecisionEngine, Recommendation,
};
pub use narrative::{Narrative, NarrativeContext};
pub use router::recommendation_router;
pub use rules::{NarrativeVariant, RuleSet, RuleSetError, RuleStore, Thresholds};
