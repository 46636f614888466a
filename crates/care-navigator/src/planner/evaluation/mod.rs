pub(crate) mod flags;
pub(crate) mod policy;
pub(crate) mod scores;
pub(crate) mod triggers;

pub use flags::extract_flags;
pub use policy::{decide_outcome, dependence_override, safety_override};
pub use scores::aggregate_scores;
pub use triggers::{derive_triggers, SafetyConjunction, SAFETY_CONJUNCTIONS};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{AnswerSet, CategoryScores, FinalDecision, FlagSet, ScoredCategory, TriggerSet};
use super::narrative::{select_narrative, Narrative, NarrativeContext};
use super::rules::RuleSet;

/// Stateless pipeline bound to one rule snapshot.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    rules: Arc<RuleSet>,
}

impl DecisionEngine {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run the whole pipeline: flags, triggers, scores, decision, narrative.
    pub fn evaluate(&self, answers: &AnswerSet, context: &NarrativeContext) -> Recommendation {
        let flags = extract_flags(answers, &self.rules);
        let mut recommendation = self.evaluate_flags(flags, context);
        recommendation.answered_questions = answers.len();
        recommendation
    }

    /// Pipeline entry for callers that already hold a flag set.
    pub fn evaluate_flags(&self, flags: FlagSet, context: &NarrativeContext) -> Recommendation {
        let triggers = derive_triggers(&flags, &self.rules);
        let scores = aggregate_scores(&flags, &triggers, &self.rules);
        let decision = decide_outcome(&scores, &triggers, self.rules.thresholds());

        debug!(
            flags = flags.len(),
            assisted_living = scores.get(ScoredCategory::AssistedLiving),
            in_home = scores.get(ScoredCategory::InHome),
            "scored evaluation"
        );

        let mut context = context.clone();
        context.set_default("name", "your loved one");
        context.set_default("care_type", decision.category.label());
        for category in ScoredCategory::ALL {
            context.set_default(&format!("{}_score", category.key()), scores.get(category));
        }

        let narrative = select_narrative(&decision, &flags, &self.rules, &context);

        info!(
            decision = %decision.category,
            basis = ?decision.basis,
            variant = ?narrative.variant,
            rules = self.rules.version(),
            "recommendation evaluated"
        );

        Recommendation {
            rule_version: self.rules.version().to_string(),
            answered_questions: 0,
            flags,
            triggers,
            scores,
            decision,
            narrative,
        }
    }
}

/// Everything one evaluation produced. The caller owns persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule_version: String,
    pub answered_questions: usize,
    pub flags: FlagSet,
    pub triggers: TriggerSet,
    pub scores: CategoryScores,
    pub decision: FinalDecision,
    pub narrative: Narrative,
}
