use super::super::domain::{
    FlagSet, TriggerSet, MEMORY_CARE_REQUIRED, NO_SUPPORT, SEVERE_COGNITIVE_RISK,
};
use super::super::rules::RuleSet;

/// Built-in rule that fires only when every listed flag is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyConjunction {
    pub trigger: &'static str,
    pub requires: &'static [&'static str],
}

impl SafetyConjunction {
    pub fn holds(&self, flags: &FlagSet) -> bool {
        flags.contains_all(self.requires.iter().copied())
    }
}

/// Safety rules compiled into the engine. Rule documents cannot add, remove,
/// or rename these.
pub const SAFETY_CONJUNCTIONS: &[SafetyConjunction] = &[SafetyConjunction {
    trigger: MEMORY_CARE_REQUIRED,
    requires: &[SEVERE_COGNITIVE_RISK, NO_SUPPORT],
}];

pub fn is_safety_trigger(name: &str) -> bool {
    safety_conjunction(name).is_some()
}

pub fn safety_conjunction(name: &str) -> Option<&'static SafetyConjunction> {
    SAFETY_CONJUNCTIONS
        .iter()
        .find(|conjunction| conjunction.trigger == name)
}

/// Safety conjunctions that hold for `flags`, in declaration order.
pub fn fired_safety_conjunctions(
    flags: &FlagSet,
) -> impl Iterator<Item = &'static SafetyConjunction> + '_ {
    SAFETY_CONJUNCTIONS
        .iter()
        .filter(move |conjunction| conjunction.holds(flags))
}

/// Evaluate configured count-threshold triggers, then the safety
/// conjunctions. The result is built from scratch on every call.
pub fn derive_triggers(flags: &FlagSet, rules: &RuleSet) -> TriggerSet {
    let mut triggers = TriggerSet::default();

    for trigger in rules.count_triggers() {
        if flags.count_present(&trigger.flags) >= trigger.minimum_count {
            triggers.fire(trigger.name.clone());
        }
    }

    for conjunction in fired_safety_conjunctions(flags) {
        triggers.fire(conjunction.trigger);
    }

    triggers
}
