use tracing::trace;

use super::super::domain::{AnswerSet, FlagSet};
use super::super::rules::RuleSet;

/// Apply every question rule to the answers. Unanswered questions contribute
/// nothing; several rules naming the same flag combine with OR.
pub fn extract_flags(answers: &AnswerSet, rules: &RuleSet) -> FlagSet {
    let mut flags = FlagSet::new();

    for question in rules.questions() {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };

        for rule in &question.rules {
            if rule.when.holds(answer) && flags.insert(rule.flag.clone()) {
                trace!(question = %question.id, flag = %rule.flag, "flag raised");
            }
        }
    }

    flags
}
