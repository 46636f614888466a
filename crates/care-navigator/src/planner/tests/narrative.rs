use std::collections::BTreeSet;

use super::common::*;
use crate::planner::domain::{CareCategory, DecisionBasis, FinalDecision};
use crate::planner::narrative::{render_template, select_narrative, select_variant, NarrativeContext};
use crate::planner::rules::NarrativeVariant;

fn decision(category: CareCategory, basis: DecisionBasis) -> FinalDecision {
    FinalDecision {
        category,
        basis,
        qualifying_flags: BTreeSet::new(),
    }
}

#[test]
fn financial_concern_outranks_safety_and_mobility() {
    let rules = reference_rules();
    let present = flags(&[
        "needs_financial_assistance",
        "high_safety_concern",
        "moderate_mobility",
    ]);

    let variant = select_variant(
        &decision(CareCategory::AssistedLiving, DecisionBasis::AssistedLivingThreshold),
        &present,
        &rules,
    );

    assert_eq!(variant, NarrativeVariant::Financial);
}

#[test]
fn safety_concern_outranks_mobility() {
    let rules = reference_rules();
    let present = flags(&["moderate_safety_concern", "high_mobility_dependence"]);

    let variant = select_variant(
        &decision(CareCategory::InHome, DecisionBasis::InHomeThreshold),
        &present,
        &rules,
    );

    assert_eq!(variant, NarrativeVariant::Safety);
}

#[test]
fn blocks_without_the_variant_fall_back_to_base() {
    let rules = reference_rules();
    let present = flags(&["needs_financial_assistance"]);

    let variant = select_variant(
        &decision(CareCategory::NoCareNeeded, DecisionBasis::Fallback),
        &present,
        &rules,
    );

    assert_eq!(variant, NarrativeVariant::Base);
}

#[test]
fn variant_selection_is_deterministic() {
    let rules = reference_rules();
    let present = flags(&["high_safety_concern", "moderate_mobility"]);
    let chosen = decision(CareCategory::InHome, DecisionBasis::InHomeThreshold);
    let context = NarrativeContext::new().with("name", "Dad");

    let first = select_narrative(&chosen, &present, &rules, &context);
    for _ in 0..5 {
        assert_eq!(select_narrative(&chosen, &present, &rules, &context), first);
    }
}

#[test]
fn override_template_only_for_safety_basis() {
    let rules = reference_rules();
    let present = flags(&[]);

    let overridden = select_variant(
        &decision(CareCategory::MemoryCare, DecisionBasis::SafetyOverride),
        &present,
        &rules,
    );
    let replayed = select_variant(
        &decision(CareCategory::MemoryCare, DecisionBasis::Fallback),
        &present,
        &rules,
    );

    assert_eq!(overridden, NarrativeVariant::Override);
    assert_eq!(replayed, NarrativeVariant::Base);
}

#[test]
fn rendered_text_uses_context_values() {
    let rules = reference_rules();
    let context = NarrativeContext::new().with("name", "Mom");

    let narrative = select_narrative(
        &decision(CareCategory::NoCareNeeded, DecisionBasis::Fallback),
        &flags(&[]),
        &rules,
        &context,
    );

    assert!(narrative.text.starts_with("Mom appears to be managing well"));
    assert!(narrative.unresolved.is_empty());
}

#[test]
fn unknown_placeholders_stay_visible() {
    let context = NarrativeContext::new().with("name", "Alex");

    let (text, unresolved) = render_template("{name} pays {monthly_cost} for {name}", &context);

    assert_eq!(text, "Alex pays {monthly_cost} for Alex");
    assert_eq!(unresolved, vec!["monthly_cost".to_string()]);
}

#[test]
fn stray_braces_are_copied_through() {
    let context = NarrativeContext::new().with("name", "Alex");

    let (text, unresolved) = render_template("{ {name} } {not a key} {", &context);

    assert_eq!(text, "{ Alex } {not a key} {");
    assert!(unresolved.is_empty());
}

#[test]
fn engine_fills_score_placeholders() {
    let recommendation = engine().evaluate(
        &high_dependence_answers(),
        &NarrativeContext::new().with("name", "Pat"),
    );

    assert!(recommendation.narrative.text.contains("Pat"));
    assert!(recommendation.narrative.text.contains("(score 8)"));
}

#[test]
fn financial_variant_follows_flags_outside_the_qualifying_set() {
    let answers = high_dependence_answers().with("q8", 4);

    let recommendation = engine().evaluate(&answers, &NarrativeContext::new().with("name", "Pat"));

    assert_eq!(recommendation.decision.category, CareCategory::AssistedLiving);
    assert!(!recommendation
        .decision
        .qualifying_flags
        .contains("needs_financial_assistance"));
    assert_eq!(recommendation.narrative.variant, NarrativeVariant::Financial);
}
