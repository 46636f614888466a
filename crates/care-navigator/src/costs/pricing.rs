use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{
    CareLevel, ChronicLoad, CostError, Location, MemoryCareAcuity, Mobility, RoomType,
};

const REFERENCE_PRICING: &str = include_str!("../../rules/pricing.json");

/// Rate tables consumed by the calculator. Category sections are optional:
/// a missing section means the category is not priced at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    pub version: String,
    pub room_rates: BTreeMap<RoomType, f64>,
    #[serde(default)]
    pub assisted_living: Option<AssistedLivingPricing>,
    #[serde(default)]
    pub memory_care: Option<MemoryCarePricing>,
    #[serde(default)]
    pub in_home: Option<InHomePricing>,
    pub mobility_adders: MobilityAdders,
    pub chronic_adders: BTreeMap<ChronicLoad, f64>,
    pub location_multipliers: BTreeMap<Location, f64>,
    #[serde(default)]
    pub household: HouseholdSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistedLivingPricing {
    pub care_level_adders: BTreeMap<CareLevel, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCarePricing {
    pub multiplier: f64,
    pub acuity_adders: BTreeMap<MemoryCareAcuity, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InHomePricing {
    pub hourly_rates: Vec<HourlyTier>,
    pub default_hourly_rate: f64,
}

impl InHomePricing {
    /// Rate of the largest tier whose `min_hours` does not exceed `hours`.
    pub fn hourly_rate(&self, hours: f64) -> f64 {
        self.hourly_rates
            .iter()
            .filter(|tier| tier.min_hours <= hours)
            .max_by(|a, b| a.min_hours.total_cmp(&b.min_hours))
            .map(|tier| tier.rate)
            .unwrap_or(self.default_hourly_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyTier {
    pub min_hours: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityAdders {
    pub facility: BTreeMap<Mobility, f64>,
    pub in_home: BTreeMap<Mobility, f64>,
}

/// Household figures that are configuration rather than user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSettings {
    pub ltc_monthly_add: f64,
    pub display_cap_years: f64,
}

impl Default for HouseholdSettings {
    fn default() -> Self {
        Self {
            ltc_monthly_add: 1800.0,
            display_cap_years: 30.0,
        }
    }
}

impl PricingTable {
    pub fn reference() -> Result<Self, CostError> {
        Self::from_json(REFERENCE_PRICING)
    }

    pub fn from_json(raw: &str) -> Result<Self, CostError> {
        let table: PricingTable = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CostError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CostError::PricingIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Every enum value must be priced and every amount finite and
    /// non-negative, so lookups during a calculation cannot miss.
    pub fn validate(&self) -> Result<(), CostError> {
        if self.version.trim().is_empty() {
            return Err(invalid("version label is empty"));
        }

        complete("room_rates", &self.room_rates, &RoomType::ALL)?;
        complete("mobility_adders.facility", &self.mobility_adders.facility, &Mobility::ALL)?;
        complete("mobility_adders.in_home", &self.mobility_adders.in_home, &Mobility::ALL)?;
        complete("chronic_adders", &self.chronic_adders, &ChronicLoad::ALL)?;
        complete("location_multipliers", &self.location_multipliers, &Location::ALL)?;

        if let Some(assisted) = &self.assisted_living {
            complete(
                "assisted_living.care_level_adders",
                &assisted.care_level_adders,
                &CareLevel::ALL,
            )?;
        }

        if let Some(memory) = &self.memory_care {
            non_negative("memory_care.multiplier", memory.multiplier)?;
            complete(
                "memory_care.acuity_adders",
                &memory.acuity_adders,
                &MemoryCareAcuity::ALL,
            )?;
        }

        if let Some(in_home) = &self.in_home {
            non_negative("in_home.default_hourly_rate", in_home.default_hourly_rate)?;
            for tier in &in_home.hourly_rates {
                non_negative("in_home.hourly_rates.min_hours", tier.min_hours)?;
                non_negative("in_home.hourly_rates.rate", tier.rate)?;
            }
        }

        non_negative("household.ltc_monthly_add", self.household.ltc_monthly_add)?;
        non_negative("household.display_cap_years", self.household.display_cap_years)?;
        Ok(())
    }
}

fn complete<K: Ord + std::fmt::Debug>(
    table: &str,
    values: &BTreeMap<K, f64>,
    expected: &[K],
) -> Result<(), CostError> {
    if let Some(missing) = expected.iter().find(|key| !values.contains_key(*key)) {
        return Err(invalid(format!("{table} has no entry for {missing:?}")));
    }
    for (key, value) in values {
        non_negative(&format!("{table}.{key:?}"), *value)?;
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), CostError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be a non-negative number, found {value}")))
    }
}

fn invalid(reason: impl Into<String>) -> CostError {
    CostError::InvalidPricing(reason.into())
}
