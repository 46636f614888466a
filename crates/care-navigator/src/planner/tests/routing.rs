use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::planner::router::recommendation_router;
use crate::planner::rules::{RuleSet, RuleStore};

fn router() -> axum::Router {
    let store = RuleStore::new(RuleSet::reference().expect("reference rules load"));
    recommendation_router(Arc::new(store))
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn recommendation_endpoint_returns_decision_and_narrative() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/recommendations",
            json!({
                "answers": { "q1": 2, "q2": 2, "q4": 2, "q5": 3 },
                "context": { "name": "Grandpa" }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"]["category"], "in_home");
    assert_eq!(body["narrative"]["variant"], "mobility");
    assert_eq!(body["answered_questions"], 4);
    assert!(body["narrative"]["text"]
        .as_str()
        .expect("text")
        .contains("Grandpa"));
}

#[tokio::test]
async fn safety_case_is_reported_as_memory_care() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/recommendations",
            json!({ "answers": { "q4": 4, "q5": 4 } }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"]["category"], "memory_care");
    assert_eq!(body["decision"]["basis"], "safety_override");
    assert_eq!(body["narrative"]["variant"], "override");
}

#[tokio::test]
async fn override_endpoint_replaces_decision_when_conjunction_holds() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/recommendations/override",
            json!({
                "flags": ["severe_cognitive_risk", "no_support"],
                "decision": {
                    "category": "in_home",
                    "basis": "in_home_threshold",
                    "qualifying_flags": ["limited_support"]
                }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["category"], "memory_care");
    assert_eq!(
        body["qualifying_flags"],
        json!(["no_support", "severe_cognitive_risk"])
    );
}

#[tokio::test]
async fn override_endpoint_leaves_other_decisions_alone() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/recommendations/override",
            json!({
                "flags": ["severe_cognitive_risk"],
                "decision": {
                    "category": "assisted_living",
                    "basis": "assisted_living_threshold",
                    "qualifying_flags": []
                }
            }),
        ))
        .await
        .expect("router responds");

    let body = read_json_body(response).await;
    assert_eq!(body["category"], "assisted_living");
}

#[tokio::test]
async fn malformed_answers_are_rejected() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/recommendations",
            json!({ "answers": ["q1", 2] }),
        ))
        .await
        .expect("router responds");

    assert!(response.status().is_client_error());
}
