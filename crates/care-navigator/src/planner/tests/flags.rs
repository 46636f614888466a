use super::common::*;
use crate::planner::domain::AnswerSet;
use crate::planner::evaluation::extract_flags;
use crate::planner::rules::Predicate;

#[test]
fn unanswered_questions_raise_nothing() {
    let rules = reference_rules();
    let flags = extract_flags(&AnswerSet::new(), &rules);
    assert!(flags.is_empty());
}

#[test]
fn partial_answers_degrade_gracefully() {
    let rules = reference_rules();
    let answers = AnswerSet::new().with("q2", 4).with("q99", 1);

    let flags = extract_flags(&answers, &rules);

    assert_eq!(flags, super::common::flags(&["high_mobility_dependence"]));
}

#[test]
fn rules_targeting_the_same_flag_combine() {
    let rules = reference_rules();

    let from_caregiver = extract_flags(&AnswerSet::new().with("q4", 4), &rules);
    let from_supervision = extract_flags(&AnswerSet::new().with("q9", 2), &rules);
    let from_both = extract_flags(&AnswerSet::new().with("q4", 4).with("q9", 2), &rules);

    assert!(from_caregiver.contains("no_support"));
    assert!(from_supervision.contains("no_support"));
    assert_eq!(from_both.len(), 1);
}

#[test]
fn text_choice_answers_match_numeric_rules() {
    let rules = reference_rules();
    let answers = AnswerSet::new().with("q5", " 4 ");

    let flags = extract_flags(&answers, &rules);

    assert!(flags.contains("severe_cognitive_risk"));
}

#[test]
fn unmatched_answer_types_do_not_fire() {
    let rules = reference_rules();
    let answers = AnswerSet::new().with("q1", true).with("q2", "wheelchair");

    assert!(extract_flags(&answers, &rules).is_empty());
}

#[test]
fn range_predicates_compare_numbers() {
    let at_least = Predicate::AtLeast(3.0);
    let at_most = Predicate::AtMost(2.0);

    assert!(at_least.holds(&3.into()));
    assert!(!at_least.holds(&2.5.into()));
    assert!(at_most.holds(&"1".into()));
    assert!(!at_most.holds(&true.into()));
    assert!(Predicate::Answered.holds(&false.into()));
}
