use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{FinalDecision, FlagSet};
use super::rules::{NarrativeVariant, RuleSet};

/// Values substituted into `{placeholder}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NarrativeContext(BTreeMap<String, String>);

impl NarrativeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Insert only when the caller has not supplied the key already.
    pub fn set_default(&mut self, key: &str, value: impl ToString) {
        self.0
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for NarrativeContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.to_string()))
                .collect(),
        )
    }
}

/// Rendered explanation for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub variant: NarrativeVariant,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// Pick the template variant for a decision.
///
/// Safety overrides use the block's `override` template when it exists.
/// Otherwise the first qualifying variant (in the configured priority) whose
/// flag group intersects `flags` and whose template exists wins, falling back
/// to `base`.
///
/// `flags` is the full evaluated set rather than the decision's qualifying
/// flags: negatively weighted flags such as `needs_financial_assistance` never
/// qualify, yet they must still select the financial variant.
pub fn select_variant(decision: &FinalDecision, flags: &FlagSet, rules: &RuleSet) -> NarrativeVariant {
    let block = rules.narrative_block(decision.category);

    if decision.is_safety_override() && block.template(NarrativeVariant::Override).is_some() {
        return NarrativeVariant::Override;
    }

    rules
        .variant_priority()
        .iter()
        .copied()
        .find(|variant| {
            block.template(*variant).is_some()
                && rules
                    .variant_flags(*variant)
                    .map(|group| group.iter().any(|flag| flags.contains(flag)))
                    .unwrap_or(false)
        })
        .unwrap_or(NarrativeVariant::Base)
}

pub fn select_narrative(
    decision: &FinalDecision,
    flags: &FlagSet,
    rules: &RuleSet,
    context: &NarrativeContext,
) -> Narrative {
    let variant = select_variant(decision, flags, rules);
    let block = rules.narrative_block(decision.category);
    let template = block.template(variant).unwrap_or_else(|| block.base());
    let (text, unresolved) = render_template(template, context);

    if !unresolved.is_empty() {
        warn!(
            category = %decision.category,
            ?variant,
            placeholders = ?unresolved,
            "narrative rendered with unresolved placeholders"
        );
    }

    Narrative {
        variant,
        text,
        unresolved,
    }
}

/// Substitute `{key}` tokens. Unknown keys stay in the text verbatim so the
/// gap is visible, and are returned alongside it. Braces that do not form a
/// token are copied through.
pub fn render_template(template: &str, context: &NarrativeContext) -> (String, Vec<String>) {
    let mut output = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token_end = after.find('}').filter(|end| is_placeholder_key(&after[..*end]));
        match token_end {
            Some(end) => {
                let key = &after[..end];
                match context.get(key) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push('{');
                        output.push_str(key);
                        output.push('}');
                        if !unresolved.iter().any(|seen| seen == key) {
                            unresolved.push(key.to_string());
                        }
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    (output, unresolved)
}

fn is_placeholder_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
