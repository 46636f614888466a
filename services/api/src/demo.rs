use crate::infra::{load_calculator, load_rule_store, read_json_file};
use care_navigator::config::AppConfig;
use care_navigator::costs::{
    household_picture, Assets, CarePlanCost, CareLevel, ChronicLoad, CostInputs,
    CostResult, CostScenario, HouseholdInputs, Location, MemoryCareAcuity, Mobility, MonthlyCosts,
    PersonIncome, RoomType,
};
use care_navigator::error::AppError;
use care_navigator::planner::{
    AnswerSet, CareCategory, DecisionEngine, FlagSet, NarrativeContext, Recommendation,
    ScoredCategory,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Name used in the narrative
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Print the full evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CostArgs {
    /// JSON file holding the cost scenario and optional line items
    #[arg(long)]
    pub(crate) inputs: PathBuf,
    /// Care category to price (defaults to the scenario's category)
    #[arg(long, value_parser = crate::infra::parse_category)]
    pub(crate) category: Option<CareCategory>,
    /// Regional pricing to apply
    #[arg(long, value_parser = crate::infra::parse_location, default_value = "national")]
    pub(crate) location: Location,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Regional pricing to apply to the sample plan
    #[arg(long, value_parser = crate::infra::parse_location, default_value = "national")]
    pub(crate) location: Location,
    /// Write the plan's cost breakdown to this CSV file instead of stdout
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = load_rule_store(&config.rules)?;
    let engine = DecisionEngine::new(store.snapshot());

    let answers: AnswerSet = read_json_file(&args.answers)?;
    let mut context = NarrativeContext::new();
    if let Some(name) = args.name.as_deref() {
        context = context.with("name", name);
    }

    let recommendation = engine.evaluate(&answers, &context);
    if args.json {
        return print_json(&recommendation);
    }

    render_recommendation(args.name.as_deref().unwrap_or("Person"), &recommendation);
    Ok(())
}

pub(crate) fn run_cost(args: CostArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let calculator = load_calculator(&config.rules)?;

    let inputs: CostInputs = read_json_file(&args.inputs)?;
    let category = args
        .category
        .unwrap_or_else(|| inputs.scenario.category());
    let result = calculator.monthly_cost(category, &inputs, args.location)?;

    if args.json {
        return print_json(&result);
    }

    render_cost(&result);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { location, csv } = args;
    let config = AppConfig::load()?;
    let store = load_rule_store(&config.rules)?;
    let calculator = load_calculator(&config.rules)?;
    let engine = DecisionEngine::new(store.snapshot());

    println!("Care navigator demo ({} pricing)", location);
    println!("Rules {}\n", engine.rules().version());

    let mut plan = CarePlanCost::new();
    for (name, answers) in sample_household() {
        let context = NarrativeContext::new().with("name", name);
        let recommendation = engine.evaluate(&answers, &context);
        render_recommendation(name, &recommendation);

        match sample_inputs(recommendation.decision.category, &recommendation.flags) {
            Some(inputs) => {
                let result =
                    calculator.monthly_cost(recommendation.decision.category, &inputs, location)?;
                render_cost(&result);
                plan.add(name, result);
            }
            None => println!("  No paid care to price."),
        }
        println!();
    }

    let combined_total = plan.combined_total()?;
    println!("Combined monthly cost: ${combined_total}");

    let picture = household_picture(
        &sample_finances(combined_total),
        &calculator.pricing().household,
    )?;
    println!(
        "Household gap: ${} per month, assets last {} years {} months",
        picture.gap, picture.runway_years, picture.runway_months
    );
    if let Some(years) = picture.years_funded {
        println!("Years funded: {years}");
    }

    match csv {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            plan.write_csv(file)?;
            println!("\nCost breakdown written to {}", path.display());
        }
        None => {
            println!("\nCost breakdown (CSV)");
            print!("{}", plan.to_csv_string()?);
        }
    }

    Ok(())
}

fn sample_household() -> Vec<(&'static str, AnswerSet)> {
    vec![
        (
            "Mom",
            AnswerSet::new()
                .with("q1", 2)
                .with("q2", 2)
                .with("q4", 2)
                .with("q5", 3),
        ),
        (
            "Dad",
            AnswerSet::new()
                .with("q1", 3)
                .with("q3", 3)
                .with("q6", 3)
                .with("q7", 3)
                .with("q8", 1),
        ),
    ]
}

/// Starting cost inputs for a decided category, prefilled from the flags.
fn sample_inputs(category: CareCategory, flags: &FlagSet) -> Option<CostInputs> {
    let mobility = Mobility::from_flags(flags);
    let scenario = match category {
        CareCategory::AssistedLiving => CostScenario::AssistedLiving {
            care_level: CareLevel::Medium,
            room_type: RoomType::Studio,
            mobility,
            chronic: ChronicLoad::None,
        },
        CareCategory::MemoryCare => CostScenario::MemoryCare {
            acuity: MemoryCareAcuity::Standard,
            room_type: RoomType::Studio,
            mobility,
            chronic: ChronicLoad::None,
        },
        CareCategory::InHome => CostScenario::InHome {
            hours_per_day: 6.0,
            days_per_month: 20,
            mobility,
            chronic: ChronicLoad::from_conditions(&["diabetes"]),
        },
        CareCategory::NoCareNeeded => return None,
    };
    Some(CostInputs::new(scenario))
}

fn sample_finances(care_total: i64) -> HouseholdInputs {
    HouseholdInputs {
        people: vec![
            PersonIncome {
                name: "Mom".to_string(),
                social_security: 1_650.0,
                has_ltc_insurance: true,
                ..PersonIncome::default()
            },
            PersonIncome {
                name: "Dad".to_string(),
                social_security: 2_100.0,
                pension: 900.0,
                ..PersonIncome::default()
            },
        ],
        costs: MonthlyCosts {
            care: care_total as f64,
            home_carrying: 1_400.0,
            ..MonthlyCosts::default()
        },
        assets: Assets {
            common: 180_000.0,
            less_common: 40_000.0,
            ..Assets::default()
        },
        ..HouseholdInputs::default()
    }
}

fn render_recommendation(name: &str, recommendation: &Recommendation) {
    println!("{}: {}", name, recommendation.decision.summary());
    println!(
        "  Scores: assisted living {}, in-home {}",
        recommendation.scores.get(ScoredCategory::AssistedLiving),
        recommendation.scores.get(ScoredCategory::InHome)
    );
    if !recommendation.triggers.is_empty() {
        let fired: Vec<&str> = recommendation.triggers.iter().collect();
        println!("  Triggers: {}", fired.join(", "));
    }
    println!("  {}", recommendation.narrative.text);
}

fn render_cost(result: &CostResult) {
    println!(
        "  Estimated monthly cost ({}, {}): ${}",
        result.category.label(),
        result.location,
        result.monthly_total
    );
    for line in &result.breakdown {
        println!("    {:<48} {:>8}", line.label, line.amount);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_navigator::costs::CostCalculator;
    use care_navigator::planner::RuleSet;
    use std::sync::Arc;

    #[test]
    fn sample_household_covers_two_pathways() {
        let engine = DecisionEngine::new(Arc::new(RuleSet::reference().expect("rules")));

        let categories: Vec<CareCategory> = sample_household()
            .into_iter()
            .map(|(_, answers)| {
                engine
                    .evaluate(&answers, &NarrativeContext::new())
                    .decision
                    .category
            })
            .collect();

        assert_eq!(
            categories,
            vec![CareCategory::InHome, CareCategory::AssistedLiving]
        );
    }

    #[test]
    fn sample_inputs_match_decided_category() {
        let flags: FlagSet = ["moderate_mobility"].into_iter().collect();

        for category in [
            CareCategory::AssistedLiving,
            CareCategory::MemoryCare,
            CareCategory::InHome,
        ] {
            let inputs = sample_inputs(category, &flags).expect("priced category");
            assert_eq!(inputs.scenario.category(), category);
            assert_eq!(inputs.scenario.mobility(), Mobility::Walker);
        }
        assert!(sample_inputs(CareCategory::NoCareNeeded, &flags).is_none());
    }

    #[test]
    fn sample_plan_prices_every_person() {
        let calculator = CostCalculator::reference().expect("pricing");
        let engine = DecisionEngine::new(Arc::new(RuleSet::reference().expect("rules")));
        let mut plan = CarePlanCost::new();

        for (name, answers) in sample_household() {
            let recommendation = engine.evaluate(&answers, &NarrativeContext::new());
            let inputs = sample_inputs(recommendation.decision.category, &recommendation.flags)
                .expect("priced category");
            let result = calculator
                .monthly_cost(recommendation.decision.category, &inputs, Location::National)
                .expect("priced");
            plan.add(name, result);
        }

        // Mom: 6h x 20d at $42 + walker + diabetes. Dad: medium studio.
        assert_eq!(plan.combined_total().expect("total"), (5040 + 150 + 200) + (4200 + 750));
    }
}
