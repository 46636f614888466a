use std::fmt;

use serde::{Deserialize, Serialize};

use crate::planner::domain::{CareCategory, FlagSet};

/// Assisted living care tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareLevel {
    Low,
    Medium,
    High,
}

impl CareLevel {
    pub const ALL: [CareLevel; 3] = [CareLevel::Low, CareLevel::Medium, CareLevel::High];

    pub const fn label(self) -> &'static str {
        match self {
            CareLevel::Low => "Low",
            CareLevel::Medium => "Medium",
            CareLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Studio,
    OneBedroom,
    TwoBedroom,
    Shared,
}

impl RoomType {
    pub const ALL: [RoomType; 4] = [
        RoomType::Studio,
        RoomType::OneBedroom,
        RoomType::TwoBedroom,
        RoomType::Shared,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RoomType::Studio => "studio",
            RoomType::OneBedroom => "one bedroom",
            RoomType::TwoBedroom => "two bedroom",
            RoomType::Shared => "shared room",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCareAcuity {
    Standard,
    HighAcuity,
}

impl MemoryCareAcuity {
    pub const ALL: [MemoryCareAcuity; 2] = [MemoryCareAcuity::Standard, MemoryCareAcuity::HighAcuity];

    pub const fn label(self) -> &'static str {
        match self {
            MemoryCareAcuity::Standard => "standard",
            MemoryCareAcuity::HighAcuity => "high acuity",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mobility {
    #[default]
    None,
    Walker,
    Wheelchair,
}

impl Mobility {
    pub const ALL: [Mobility; 3] = [Mobility::None, Mobility::Walker, Mobility::Wheelchair];

    pub const fn label(self) -> &'static str {
        match self {
            Mobility::None => "none",
            Mobility::Walker => "walker",
            Mobility::Wheelchair => "wheelchair",
        }
    }

    /// Starting value implied by the questionnaire flags.
    pub fn from_flags(flags: &FlagSet) -> Self {
        if flags.contains("high_mobility_dependence") {
            Mobility::Wheelchair
        } else if flags.contains("moderate_mobility") {
            Mobility::Walker
        } else {
            Mobility::None
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChronicLoad {
    #[default]
    None,
    Diabetes,
    Parkinsons,
    Complex,
}

impl ChronicLoad {
    pub const ALL: [ChronicLoad; 4] = [
        ChronicLoad::None,
        ChronicLoad::Diabetes,
        ChronicLoad::Parkinsons,
        ChronicLoad::Complex,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ChronicLoad::None => "none",
            ChronicLoad::Diabetes => "diabetes",
            ChronicLoad::Parkinsons => "Parkinson's",
            ChronicLoad::Complex => "complex",
        }
    }

    /// A single diabetes or Parkinson's diagnosis keeps its own price; any
    /// other condition, or more than one, is priced as complex.
    pub fn from_conditions<S: AsRef<str>>(conditions: &[S]) -> Self {
        match conditions {
            [] => ChronicLoad::None,
            [only] => match normalize_condition(only.as_ref()).as_str() {
                "diabetes" => ChronicLoad::Diabetes,
                "parkinsons" => ChronicLoad::Parkinsons,
                _ => ChronicLoad::Complex,
            },
            _ => ChronicLoad::Complex,
        }
    }

    /// Used when only a count of conditions is known.
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            ChronicLoad::None
        } else {
            ChronicLoad::Complex
        }
    }
}

fn normalize_condition(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    National,
    Washington,
    California,
    Texas,
    Florida,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::National,
        Location::Washington,
        Location::California,
        Location::Texas,
        Location::Florida,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Location::National => "National",
            Location::Washington => "Washington",
            Location::California => "California",
            Location::Texas => "Texas",
            Location::Florida => "Florida",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters that only make sense for one care category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CostScenario {
    AssistedLiving {
        care_level: CareLevel,
        room_type: RoomType,
        #[serde(default)]
        mobility: Mobility,
        #[serde(default)]
        chronic: ChronicLoad,
    },
    MemoryCare {
        acuity: MemoryCareAcuity,
        room_type: RoomType,
        #[serde(default)]
        mobility: Mobility,
        #[serde(default)]
        chronic: ChronicLoad,
    },
    InHome {
        hours_per_day: f64,
        days_per_month: u32,
        #[serde(default)]
        mobility: Mobility,
        #[serde(default)]
        chronic: ChronicLoad,
    },
}

impl CostScenario {
    pub fn category(&self) -> CareCategory {
        match self {
            CostScenario::AssistedLiving { .. } => CareCategory::AssistedLiving,
            CostScenario::MemoryCare { .. } => CareCategory::MemoryCare,
            CostScenario::InHome { .. } => CareCategory::InHome,
        }
    }

    pub fn mobility(&self) -> Mobility {
        match self {
            CostScenario::AssistedLiving { mobility, .. }
            | CostScenario::MemoryCare { mobility, .. }
            | CostScenario::InHome { mobility, .. } => *mobility,
        }
    }

    pub fn chronic(&self) -> ChronicLoad {
        match self {
            CostScenario::AssistedLiving { chronic, .. }
            | CostScenario::MemoryCare { chronic, .. }
            | CostScenario::InHome { chronic, .. } => *chronic,
        }
    }
}

/// Net proceeds from selling the home, spread as a monthly credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeSale {
    pub net_proceeds: f64,
    pub spread_months: u32,
    #[serde(default)]
    pub apply: bool,
}

/// One-time accessibility work amortised into the monthly figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeModification {
    pub upfront_cost: f64,
    pub amortize_months: u32,
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub scenario: CostScenario,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_sale: Option<HomeSale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_modification: Option<HomeModification>,
}

impl CostInputs {
    pub fn new(scenario: CostScenario) -> Self {
        Self {
            scenario,
            home_sale: None,
            home_modification: None,
        }
    }

    pub fn with_home_sale(mut self, sale: HomeSale) -> Self {
        self.home_sale = Some(sale);
        self
    }

    pub fn with_home_modification(mut self, modification: HomeModification) -> Self {
        self.home_modification = Some(modification);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostLineKind {
    Base,
    CareLevel,
    Mobility,
    Chronic,
    Location,
    HomeModification,
    HomeSale,
    Floor,
}

impl CostLineKind {
    pub const fn key(self) -> &'static str {
        match self {
            CostLineKind::Base => "base",
            CostLineKind::CareLevel => "care_level",
            CostLineKind::Mobility => "mobility",
            CostLineKind::Chronic => "chronic",
            CostLineKind::Location => "location",
            CostLineKind::HomeModification => "home_modification",
            CostLineKind::HomeSale => "home_sale",
            CostLineKind::Floor => "floor",
        }
    }
}

/// One step of the monthly figure, in whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    pub kind: CostLineKind,
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostResult {
    pub category: CareCategory,
    pub location: Location,
    pub monthly_total: i64,
    pub breakdown: Vec<CostLine>,
}

impl CostResult {
    pub fn line(&self, kind: CostLineKind) -> Option<&CostLine> {
        self.breakdown.iter().find(|line| line.kind == kind)
    }
}

/// Why a cost could not be produced. No variant ever stands in for a price.
#[derive(Debug, thiserror::Error)]
pub enum CostError {
    #[error("no pricing rule covers {category}")]
    UnsupportedScenario { category: CareCategory },
    #[error("{requested} was requested but the inputs describe {scenario}")]
    ScenarioMismatch {
        requested: CareCategory,
        scenario: CareCategory,
    },
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("invalid pricing table: {0}")]
    InvalidPricing(String),
    #[error("failed to read pricing table {path}: {source}")]
    PricingIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("pricing table is not valid JSON: {0}")]
    PricingJson(#[from] serde_json::Error),
}
