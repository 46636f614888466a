use axum::response::Response;
use serde_json::Value;

use crate::costs::calculator::CostCalculator;
use crate::costs::domain::{
    CareLevel, ChronicLoad, CostInputs, CostScenario, MemoryCareAcuity, Mobility, RoomType,
};
use crate::costs::pricing::PricingTable;

pub(super) const PRICING: &str = include_str!("../../../rules/pricing.json");

pub(super) fn reference_pricing() -> PricingTable {
    PricingTable::from_json(PRICING).expect("reference pricing loads")
}

pub(super) fn calculator() -> CostCalculator {
    CostCalculator::new(reference_pricing()).expect("reference pricing validates")
}

/// Medium care studio with a walker and diabetes: 5350 nationally.
pub(super) fn assisted_living_inputs() -> CostInputs {
    CostInputs::new(CostScenario::AssistedLiving {
        care_level: CareLevel::Medium,
        room_type: RoomType::Studio,
        mobility: Mobility::Walker,
        chronic: ChronicLoad::Diabetes,
    })
}

/// High acuity studio with a wheelchair and several conditions: 7850 nationally.
pub(super) fn memory_care_inputs() -> CostInputs {
    CostInputs::new(CostScenario::MemoryCare {
        acuity: MemoryCareAcuity::HighAcuity,
        room_type: RoomType::Studio,
        mobility: Mobility::Wheelchair,
        chronic: ChronicLoad::Complex,
    })
}

pub(super) fn in_home_inputs(hours_per_day: f64, days_per_month: u32) -> CostInputs {
    CostInputs::new(CostScenario::InHome {
        hours_per_day,
        days_per_month,
        mobility: Mobility::None,
        chronic: ChronicLoad::None,
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
