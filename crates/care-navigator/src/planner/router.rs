use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, FinalDecision, FlagSet};
use super::evaluation::{dependence_override, DecisionEngine, Recommendation};
use super::narrative::NarrativeContext;
use super::rules::RuleStore;

#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendationRequest {
    pub answers: AnswerSet,
    #[serde(default)]
    pub context: NarrativeContext,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OverrideRequest {
    pub flags: FlagSet,
    pub decision: FinalDecision,
}

/// Routes for recommendation evaluation against the store's current snapshot.
pub fn recommendation_router(store: Arc<RuleStore>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler))
        .route(
            "/api/v1/recommendations/override",
            post(override_handler),
        )
        .with_state(store)
}

pub(crate) async fn recommend_handler(
    State(store): State<Arc<RuleStore>>,
    Json(request): Json<RecommendationRequest>,
) -> Json<Recommendation> {
    let engine = DecisionEngine::new(store.snapshot());
    Json(engine.evaluate(&request.answers, &request.context))
}

pub(crate) async fn override_handler(Json(request): Json<OverrideRequest>) -> Json<FinalDecision> {
    Json(dependence_override(&request.flags, request.decision))
}
