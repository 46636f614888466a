use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use care_navigator::costs::{cost_router, CostCalculator};
use care_navigator::error::AppError;
use care_navigator::planner::{recommendation_router, RuleStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct RuleReloadResponse {
    pub(crate) version: String,
    pub(crate) loaded_at: DateTime<Utc>,
    pub(crate) source: String,
}

pub(crate) fn with_care_routes(
    rules: Arc<RuleStore>,
    calculator: Arc<CostCalculator>,
) -> axum::Router {
    recommendation_router(rules)
        .merge(cost_router(calculator))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/rules/reload", post(reload_rules_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "rules": state.rules.snapshot().version() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Re-read the rule documents. A rejected reload leaves the active rules
/// in place and reports why.
pub(crate) async fn reload_rules_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<RuleReloadResponse>, AppError> {
    let (rules, source) = match &state.rules_dir {
        Some(dir) => (
            state.rules.reload_from_dir(dir)?,
            dir.display().to_string(),
        ),
        None => (state.rules.reload_reference()?, "reference".to_string()),
    };

    Ok(Json(RuleReloadResponse {
        version: rules.version().to_string(),
        loaded_at: rules.loaded_at(),
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{load_calculator, load_rule_store};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use care_navigator::config::RulesConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool, rules_dir: Option<PathBuf>) -> (axum::Router, AppState) {
        let config = RulesConfig::default();
        let rules = load_rule_store(&config).expect("reference rules");
        let calculator = load_calculator(&config).expect("reference pricing");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            rules: rules.clone(),
            rules_dir,
        };
        let router = with_care_routes(rules, calculator).layer(Extension(state.clone()));
        (router, state)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (router, _) = app(true, None);

        let response = router
            .oneshot(request(Method::GET, "/health"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_waits_for_startup() {
        let (router, _) = app(false, None);

        let response = router
            .oneshot(request(Method::GET, "/ready"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");
    }

    #[tokio::test]
    async fn reload_without_directory_uses_reference_documents() {
        let (router, state) = app(true, None);
        let before = state.rules.snapshot();

        let response = router
            .oneshot(request(Method::POST, "/api/v1/rules/reload"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["source"], "reference");
        assert_eq!(body["version"], before.version());
        assert!(!Arc::ptr_eq(&before, &state.rules.snapshot()));
    }

    #[tokio::test]
    async fn failed_reload_keeps_serving_previous_rules() {
        let missing = std::env::temp_dir().join("care-navigator-api-missing-rules");
        let (router, state) = app(true, Some(missing));
        let before = state.rules.snapshot();

        let response = router
            .oneshot(request(Method::POST, "/api/v1/rules/reload"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(response).await["error"]
            .as_str()
            .expect("message")
            .contains("rule set error"));
        assert!(Arc::ptr_eq(&before, &state.rules.snapshot()));
    }

    #[tokio::test]
    async fn care_routes_are_mounted() {
        let (router, _) = app(true, None);

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/recommendations")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"answers":{}}"#))
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["decision"]["category"], "no_care_needed");
    }
}
