use super::super::domain::{
    CategoryScores, FlagSet, ScoreComponent, ScoredCategory, SignalSource, TriggerSet,
};
use super::super::rules::RuleSet;

/// Sum configured weights of present flags and fired triggers per category.
/// Every category is reported, at zero when nothing contributes.
pub fn aggregate_scores(flags: &FlagSet, triggers: &TriggerSet, rules: &RuleSet) -> CategoryScores {
    let mut scores = CategoryScores::zeroed();

    for category in ScoredCategory::ALL {
        let Some(table) = rules.weights(category) else {
            continue;
        };

        let signals = flags
            .iter()
            .map(|flag| (flag, SignalSource::Flag))
            .chain(triggers.iter().map(|trigger| (trigger, SignalSource::Trigger)));

        let mut total = 0.0;
        for (signal, source) in signals {
            if let Some(weight) = table.get(signal) {
                total += weight;
                scores.components.push(ScoreComponent {
                    category,
                    signal: signal.to_string(),
                    source,
                    weight: *weight,
                });
            }
        }

        scores.totals.insert(category, total);
    }

    scores
}
