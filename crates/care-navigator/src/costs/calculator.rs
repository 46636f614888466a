use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use super::domain::{
    CostError, CostInputs, CostLine, CostLineKind, CostResult, CostScenario, HomeModification,
    HomeSale, Location,
};
use super::pricing::PricingTable;
use crate::planner::domain::CareCategory;

/// Largest dollar amount accepted for a single input or breakdown line.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Turns a scenario bundle into a monthly figure. Holds only the pricing
/// table it was built with; every call is independent of the previous one.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    pricing: PricingTable,
}

impl CostCalculator {
    pub fn new(pricing: PricingTable) -> Result<Self, CostError> {
        pricing.validate()?;
        Ok(Self { pricing })
    }

    pub fn reference() -> Result<Self, CostError> {
        Self::new(PricingTable::reference()?)
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Price `inputs` for `category` at `location`.
    ///
    /// Steps run in a fixed order: base rate, care-level adder, mobility
    /// adder, chronic adder, location multiplier, home modification, home
    /// sale credit, floor at zero. Each step leaves a line in the breakdown.
    pub fn monthly_cost(
        &self,
        category: CareCategory,
        inputs: &CostInputs,
        location: Location,
    ) -> Result<CostResult, CostError> {
        if category == CareCategory::NoCareNeeded {
            return Err(CostError::UnsupportedScenario { category });
        }
        let scenario = inputs.scenario.category();
        if scenario != category {
            return Err(CostError::ScenarioMismatch {
                requested: category,
                scenario,
            });
        }

        let mut lines = Vec::new();
        self.push_base_lines(&inputs.scenario, &mut lines)?;

        let mobility = inputs.scenario.mobility();
        let mobility_table = match inputs.scenario {
            CostScenario::InHome { .. } => &self.pricing.mobility_adders.in_home,
            _ => &self.pricing.mobility_adders.facility,
        };
        lines.push(CostLine {
            kind: CostLineKind::Mobility,
            label: format!("Mobility support ({})", mobility.label()),
            amount: dollars(
                "mobility_adders",
                lookup("mobility_adders", mobility_table, &mobility)?,
            )?,
        });

        let chronic = inputs.scenario.chronic();
        lines.push(CostLine {
            kind: CostLineKind::Chronic,
            label: format!("Chronic conditions ({})", chronic.label()),
            amount: dollars(
                "chronic_adders",
                lookup("chronic_adders", &self.pricing.chronic_adders, &chronic)?,
            )?,
        });

        let subtotal = total(&lines)?;
        let multiplier = lookup(
            "location_multipliers",
            &self.pricing.location_multipliers,
            &location,
        )?;
        let adjusted = dollars("location_multipliers", subtotal as f64 * multiplier)?;
        lines.push(CostLine {
            kind: CostLineKind::Location,
            label: format!("{location} adjustment (x{multiplier})"),
            amount: adjusted - subtotal,
        });

        if let Some(modification) = inputs.home_modification.filter(|item| item.apply) {
            lines.push(modification_line(modification)?);
        }
        if let Some(sale) = inputs.home_sale.filter(|item| item.apply) {
            lines.push(sale_line(sale)?);
        }

        let mut monthly_total = total(&lines)?;
        if monthly_total < 0 {
            lines.push(CostLine {
                kind: CostLineKind::Floor,
                label: "Credits exceed monthly cost".to_string(),
                amount: -monthly_total,
            });
            monthly_total = 0;
        }

        debug!(
            category = %category,
            location = %location,
            monthly_total,
            lines = lines.len(),
            "monthly cost computed"
        );

        Ok(CostResult {
            category,
            location,
            monthly_total,
            breakdown: lines,
        })
    }

    fn push_base_lines(
        &self,
        scenario: &CostScenario,
        lines: &mut Vec<CostLine>,
    ) -> Result<(), CostError> {
        match *scenario {
            CostScenario::AssistedLiving {
                care_level,
                room_type,
                ..
            } => {
                let pricing = self
                    .pricing
                    .assisted_living
                    .as_ref()
                    .ok_or(CostError::UnsupportedScenario {
                        category: CareCategory::AssistedLiving,
                    })?;
                let room = lookup("room_rates", &self.pricing.room_rates, &room_type)?;
                lines.push(CostLine {
                    kind: CostLineKind::Base,
                    label: format!("Assisted living, {}", room_type.label()),
                    amount: dollars("room_rates", room)?,
                });
                lines.push(CostLine {
                    kind: CostLineKind::CareLevel,
                    label: format!("{} care level", care_level.label()),
                    amount: dollars(
                        "assisted_living.care_level_adders",
                        lookup(
                            "assisted_living.care_level_adders",
                            &pricing.care_level_adders,
                            &care_level,
                        )?,
                    )?,
                });
            }
            CostScenario::MemoryCare {
                acuity, room_type, ..
            } => {
                let pricing =
                    self.pricing
                        .memory_care
                        .as_ref()
                        .ok_or(CostError::UnsupportedScenario {
                            category: CareCategory::MemoryCare,
                        })?;
                let room = lookup("room_rates", &self.pricing.room_rates, &room_type)?;
                let acuity_adder =
                    lookup("memory_care.acuity_adders", &pricing.acuity_adders, &acuity)?;
                lines.push(CostLine {
                    kind: CostLineKind::Base,
                    label: format!(
                        "Memory care, {} ({})",
                        room_type.label(),
                        acuity.label()
                    ),
                    amount: dollars("memory_care", room * pricing.multiplier + acuity_adder)?,
                });
            }
            CostScenario::InHome {
                hours_per_day,
                days_per_month,
                ..
            } => {
                let pricing = self
                    .pricing
                    .in_home
                    .as_ref()
                    .ok_or(CostError::UnsupportedScenario {
                        category: CareCategory::InHome,
                    })?;
                if !hours_per_day.is_finite() || hours_per_day <= 0.0 || hours_per_day > 24.0 {
                    return Err(CostError::InvalidInput {
                        field: "hours_per_day",
                        reason: format!("expected more than 0 and at most 24, found {hours_per_day}"),
                    });
                }
                if !(1..=31).contains(&days_per_month) {
                    return Err(CostError::InvalidInput {
                        field: "days_per_month",
                        reason: format!("expected 1 to 31, found {days_per_month}"),
                    });
                }
                let rate = pricing.hourly_rate(hours_per_day);
                lines.push(CostLine {
                    kind: CostLineKind::Base,
                    label: format!(
                        "In-home care, {hours_per_day} h/day x {days_per_month} days at ${rate}/h"
                    ),
                    amount: dollars(
                        "in_home.hourly_rates",
                        hours_per_day * f64::from(days_per_month) * rate,
                    )?,
                });
            }
        }
        Ok(())
    }
}

fn modification_line(modification: HomeModification) -> Result<CostLine, CostError> {
    amount_field("home_modification.upfront_cost", modification.upfront_cost)?;
    months_field("home_modification.amortize_months", modification.amortize_months)?;
    Ok(CostLine {
        kind: CostLineKind::HomeModification,
        label: format!(
            "Home modifications over {} months",
            modification.amortize_months
        ),
        amount: dollars(
            "home_modification.upfront_cost",
            modification.upfront_cost / f64::from(modification.amortize_months),
        )?,
    })
}

fn sale_line(sale: HomeSale) -> Result<CostLine, CostError> {
    amount_field("home_sale.net_proceeds", sale.net_proceeds)?;
    months_field("home_sale.spread_months", sale.spread_months)?;
    Ok(CostLine {
        kind: CostLineKind::HomeSale,
        label: format!("Home sale proceeds over {} months", sale.spread_months),
        amount: -dollars(
            "home_sale.net_proceeds",
            sale.net_proceeds / f64::from(sale.spread_months),
        )?,
    })
}

fn amount_field(field: &'static str, value: f64) -> Result<(), CostError> {
    if value.is_finite() && (0.0..=MAX_AMOUNT).contains(&value) {
        Ok(())
    } else {
        Err(CostError::InvalidInput {
            field,
            reason: format!("expected an amount between 0 and {MAX_AMOUNT}, found {value}"),
        })
    }
}

fn months_field(field: &'static str, months: u32) -> Result<(), CostError> {
    if months == 0 {
        Err(CostError::InvalidInput {
            field,
            reason: "must cover at least one month".to_string(),
        })
    } else {
        Ok(())
    }
}

fn lookup<K: Ord + Debug>(
    table: &str,
    values: &BTreeMap<K, f64>,
    key: &K,
) -> Result<f64, CostError> {
    values
        .get(key)
        .copied()
        .ok_or_else(|| CostError::InvalidPricing(format!("{table} has no entry for {key:?}")))
}

fn total(lines: &[CostLine]) -> Result<i64, CostError> {
    lines
        .iter()
        .try_fold(0_i64, |sum, line| sum.checked_add(line.amount))
        .ok_or_else(|| CostError::InvalidInput {
            field: "monthly_total",
            reason: "breakdown does not fit in a whole-dollar total".to_string(),
        })
}

/// Round to whole dollars. Anything beyond [`MAX_AMOUNT`] is an input error.
fn dollars(field: &'static str, amount: f64) -> Result<i64, CostError> {
    let rounded = amount.round();
    if rounded.is_finite() && rounded.abs() <= MAX_AMOUNT {
        Ok(rounded as i64)
    } else {
        Err(CostError::InvalidInput {
            field,
            reason: format!("{amount} is outside the supported range of +/-{MAX_AMOUNT}"),
        })
    }
}
