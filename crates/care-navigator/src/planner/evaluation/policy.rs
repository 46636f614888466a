use std::collections::BTreeSet;

use super::super::domain::{
    CareCategory, CategoryScores, DecisionBasis, FinalDecision, FlagSet, ScoredCategory,
    TriggerSet,
};
use super::super::rules::Thresholds;
use super::triggers::{fired_safety_conjunctions, SAFETY_CONJUNCTIONS};

/// Walk the decision ladder top-down; the first rung that matches wins.
///
/// 1. a fired safety trigger forces memory care,
/// 2. assisted living score at or above its threshold,
/// 3. in-home score at or above its threshold,
/// 4. otherwise no care is needed.
///
/// Every input yields exactly one decision.
pub fn decide_outcome(
    scores: &CategoryScores,
    triggers: &TriggerSet,
    thresholds: Thresholds,
) -> FinalDecision {
    if let Some(conjunction) = SAFETY_CONJUNCTIONS
        .iter()
        .find(|conjunction| triggers.fired(conjunction.trigger))
    {
        return FinalDecision {
            category: CareCategory::MemoryCare,
            basis: DecisionBasis::SafetyOverride,
            qualifying_flags: conjunction
                .requires
                .iter()
                .map(|flag| flag.to_string())
                .collect(),
        };
    }

    if scores.get(ScoredCategory::AssistedLiving) >= thresholds.assisted_living {
        return FinalDecision {
            category: CareCategory::AssistedLiving,
            basis: DecisionBasis::AssistedLivingThreshold,
            qualifying_flags: scores.supporting_flags(ScoredCategory::AssistedLiving),
        };
    }

    if scores.get(ScoredCategory::InHome) >= thresholds.in_home {
        return FinalDecision {
            category: CareCategory::InHome,
            basis: DecisionBasis::InHomeThreshold,
            qualifying_flags: scores.supporting_flags(ScoredCategory::InHome),
        };
    }

    FinalDecision {
        category: CareCategory::NoCareNeeded,
        basis: DecisionBasis::Fallback,
        qualifying_flags: BTreeSet::new(),
    }
}

/// Safety decision for `flags`, if any built-in conjunction holds.
pub fn safety_override(flags: &FlagSet) -> Option<FinalDecision> {
    fired_safety_conjunctions(flags)
        .next()
        .map(|conjunction| FinalDecision {
            category: CareCategory::MemoryCare,
            basis: DecisionBasis::SafetyOverride,
            qualifying_flags: conjunction
                .requires
                .iter()
                .map(|flag| flag.to_string())
                .collect(),
        })
}

/// Apply the safety rule to an existing decision. When the conjunction holds
/// the memory care decision replaces `decision`; otherwise it is returned
/// unchanged. Applying it again yields the same value.
pub fn dependence_override(flags: &FlagSet, decision: FinalDecision) -> FinalDecision {
    safety_override(flags).unwrap_or(decision)
}
