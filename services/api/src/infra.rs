use care_navigator::config::RulesConfig;
use care_navigator::costs::{CostCalculator, Location, PricingTable};
use care_navigator::error::AppError;
use care_navigator::planner::{CareCategory, RuleSet, RuleStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) rules: Arc<RuleStore>,
    /// Directory re-read on reload. `None` reloads the compiled-in documents.
    pub(crate) rules_dir: Option<PathBuf>,
}

pub(crate) fn load_rule_store(config: &RulesConfig) -> Result<Arc<RuleStore>, AppError> {
    let rules = match &config.rules_dir {
        Some(dir) => RuleSet::from_dir(dir)?,
        None => RuleSet::reference()?,
    };
    info!(
        version = rules.version(),
        source = %config
            .rules_dir
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "reference".to_string()),
        "rule set loaded"
    );
    Ok(Arc::new(RuleStore::new(rules)))
}

pub(crate) fn load_calculator(config: &RulesConfig) -> Result<Arc<CostCalculator>, AppError> {
    let pricing = match &config.pricing_file {
        Some(path) => PricingTable::from_path(path)?,
        None => PricingTable::reference()?,
    };
    info!(version = %pricing.version, "pricing table loaded");
    Ok(Arc::new(CostCalculator::new(pricing)?))
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| AppError::InputJson {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_location(raw: &str) -> Result<Location, String> {
    let key = raw.trim().to_ascii_lowercase();
    serde_json::from_value(serde_json::Value::String(key))
        .map_err(|_| format!("unknown location '{raw}' (expected national, washington, california, texas or florida)"))
}

pub(crate) fn parse_category(raw: &str) -> Result<CareCategory, String> {
    CareCategory::from_key(raw.trim()).ok_or_else(|| {
        format!("unknown care category '{raw}' (expected memory_care, assisted_living, in_home or no_care_needed)")
    })
}
