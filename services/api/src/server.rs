use crate::cli::ServeArgs;
use crate::infra::{load_calculator, load_rule_store, AppState};
use crate::routes::with_care_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_navigator::config::AppConfig;
use care_navigator::error::AppError;
use care_navigator::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules = load_rule_store(&config.rules)?;
    let calculator = load_calculator(&config.rules)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        rules: rules.clone(),
        rules_dir: config.rules.rules_dir.clone(),
    };

    let app = with_care_routes(rules, calculator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "care navigator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
