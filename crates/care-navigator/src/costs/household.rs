use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pricing::HouseholdSettings;

/// Monthly income for one person in the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonIncome {
    pub name: String,
    pub social_security: f64,
    pub pension: f64,
    pub other: f64,
    pub va_benefit: f64,
    pub has_ltc_insurance: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyCosts {
    pub care: f64,
    pub home_carrying: f64,
    pub home_modifications: f64,
    pub other: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub common: f64,
    pub less_common: f64,
    pub home_sale_proceeds: f64,
    pub apply_home_sale: bool,
    pub reverse_mortgage_lump: f64,
    pub reverse_mortgage_fees: f64,
    pub modification_upfront: f64,
    pub deduct_modification_upfront: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdInputs {
    pub people: Vec<PersonIncome>,
    /// Rent, annuities, investments and similar income shared by the household.
    pub household_income: f64,
    pub reverse_mortgage_monthly: f64,
    pub costs: MonthlyCosts,
    pub assets: Assets,
}

/// Affordability summary for a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdPicture {
    pub monthly_income: i64,
    pub monthly_costs: i64,
    /// Positive when costs exceed income.
    pub gap: i64,
    pub total_assets: i64,
    pub months_runway: i64,
    pub runway_years: i64,
    pub runway_months: i64,
    /// `None` when income covers costs. Capped at the configured maximum.
    pub years_funded: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    #[error("{field} must be a finite, non-negative amount (found {value})")]
    InvalidAmount { field: String, value: f64 },
}

pub fn household_picture(
    inputs: &HouseholdInputs,
    settings: &HouseholdSettings,
) -> Result<HouseholdPicture, HouseholdError> {
    let mut income = 0.0;
    for (index, person) in inputs.people.iter().enumerate() {
        let label = if person.name.is_empty() {
            format!("people[{index}]")
        } else {
            person.name.clone()
        };
        for (field, value) in [
            ("social_security", person.social_security),
            ("pension", person.pension),
            ("other", person.other),
            ("va_benefit", person.va_benefit),
        ] {
            income += amount(&format!("{label}.{field}"), value)?;
        }
        if person.has_ltc_insurance {
            income += settings.ltc_monthly_add;
        }
    }
    income += amount("household_income", inputs.household_income)?;
    income += amount("reverse_mortgage_monthly", inputs.reverse_mortgage_monthly)?;

    let costs = &inputs.costs;
    let monthly_costs = amount("costs.care", costs.care)?
        + amount("costs.home_carrying", costs.home_carrying)?
        + amount("costs.home_modifications", costs.home_modifications)?
        + amount("costs.other", costs.other)?;

    let assets = &inputs.assets;
    let mut total_assets = amount("assets.common", assets.common)?
        + amount("assets.less_common", assets.less_common)?
        + amount("assets.reverse_mortgage_lump", assets.reverse_mortgage_lump)?
        - amount("assets.reverse_mortgage_fees", assets.reverse_mortgage_fees)?;
    if assets.apply_home_sale {
        total_assets += amount("assets.home_sale_proceeds", assets.home_sale_proceeds)?;
    }
    if assets.deduct_modification_upfront {
        total_assets -= amount("assets.modification_upfront", assets.modification_upfront)?;
    }

    let monthly_income = income.round() as i64;
    let monthly_costs = monthly_costs.round() as i64;
    let total_assets = total_assets.round() as i64;
    let gap = monthly_costs - monthly_income;

    let months_runway = if gap > 0 && total_assets > 0 {
        total_assets / gap
    } else {
        0
    };
    let years_funded = (gap > 0).then(|| {
        let years = (total_assets.max(0) as f64 / gap as f64 / 12.0 * 10.0).round() / 10.0;
        years.min(settings.display_cap_years)
    });

    debug!(gap, months_runway, "household picture computed");

    Ok(HouseholdPicture {
        monthly_income,
        monthly_costs,
        gap,
        total_assets,
        months_runway,
        runway_years: months_runway / 12,
        runway_months: months_runway % 12,
        years_funded,
    })
}

fn amount(field: &str, value: f64) -> Result<f64, HouseholdError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(HouseholdError::InvalidAmount {
            field: field.to_string(),
            value,
        })
    }
}
