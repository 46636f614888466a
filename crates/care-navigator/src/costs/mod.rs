//! Monthly cost estimates for a chosen care pathway, multi-person plan
//! totals with CSV export, and the household affordability picture.

pub mod calculator;
pub mod domain;
pub mod household;
pub mod plan;
pub mod pricing;
pub mod router;

#[cfg(test)]
mod tests;

pub use calculator::CostCalculator;
pub use domain::{
    CareLevel, ChronicLoad, CostError, CostInputs, CostLine, CostLineKind, CostResult,
    CostScenario, HomeModification, HomeSale, Location, MemoryCareAcuity, Mobility, RoomType,
};
pub use household::{
    household_picture, Assets, HouseholdError, HouseholdInputs, HouseholdPicture, MonthlyCosts,
    PersonIncome,
};
pub use plan::{CarePlanCost, ExportError, PersonCost};
pub use pricing::{HouseholdSettings, PricingTable};
pub use router::{cost_router, price_plan, PlanPerson};
