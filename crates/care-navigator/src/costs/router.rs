use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::calculator::CostCalculator;
use super::domain::{CostError, CostInputs, CostResult, Location};
use super::household::{household_picture, HouseholdInputs, HouseholdPicture};
use super::plan::{CarePlanCost, PersonCost};
use crate::error::AppError;
use crate::planner::domain::CareCategory;

#[derive(Debug, Deserialize, Serialize)]
pub struct CostRequest {
    pub category: CareCategory,
    pub inputs: CostInputs,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PlanPerson {
    pub name: String,
    pub category: CareCategory,
    pub inputs: CostInputs,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PlanRequest {
    pub people: Vec<PlanPerson>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub include_csv: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PlanResponse {
    pub people: Vec<PersonCost>,
    pub combined_total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

pub fn cost_router(calculator: Arc<CostCalculator>) -> Router {
    Router::new()
        .route("/api/v1/costs", post(cost_handler))
        .route("/api/v1/costs/plan", post(plan_handler))
        .route("/api/v1/household", post(household_handler))
        .with_state(calculator)
}

pub(crate) async fn cost_handler(
    State(calculator): State<Arc<CostCalculator>>,
    Json(request): Json<CostRequest>,
) -> Result<Json<CostResult>, AppError> {
    let result = calculator.monthly_cost(request.category, &request.inputs, request.location)?;
    Ok(Json(result))
}

pub(crate) async fn plan_handler(
    State(calculator): State<Arc<CostCalculator>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let plan = price_plan(&calculator, &request.people, request.location)?;
    let csv = if request.include_csv {
        Some(plan.to_csv_string()?)
    } else {
        None
    };

    Ok(Json(PlanResponse {
        combined_total: plan.combined_total()?,
        people: plan.entries().to_vec(),
        csv,
    }))
}

pub(crate) async fn household_handler(
    State(calculator): State<Arc<CostCalculator>>,
    Json(inputs): Json<HouseholdInputs>,
) -> Result<Json<HouseholdPicture>, AppError> {
    let picture = household_picture(&inputs, &calculator.pricing().household)?;
    Ok(Json(picture))
}

/// Price every person in order; the first failure aborts the plan.
pub fn price_plan(
    calculator: &CostCalculator,
    people: &[PlanPerson],
    location: Location,
) -> Result<CarePlanCost, CostError> {
    let mut plan = CarePlanCost::new();
    for person in people {
        let result = calculator.monthly_cost(person.category, &person.inputs, location)?;
        plan.add(person.name.clone(), result);
    }
    Ok(plan)
}
