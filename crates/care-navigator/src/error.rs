use crate::config::ConfigError;
use crate::costs::{CostError, ExportError, HouseholdError};
use crate::planner::RuleSetError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Rules(RuleSetError),
    Cost(CostError),
    Household(HouseholdError),
    Export(ExportError),
    InputJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Rules(err) => write!(f, "rule set error: {}", err),
            AppError::Cost(err) => write!(f, "cost error: {}", err),
            AppError::Household(err) => write!(f, "household error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::InputJson { path, source } => {
                write!(f, "{} is not valid JSON: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Cost(err) => Some(err),
            AppError::Household(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::InputJson { source, .. } => Some(source),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Cost(CostError::InvalidInput { .. })
            | AppError::Household(_)
            | AppError::InputJson { .. } => StatusCode::BAD_REQUEST,
            AppError::Cost(
                CostError::UnsupportedScenario { .. } | CostError::ScenarioMismatch { .. },
            )
            | AppError::Rules(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Cost(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RuleSetError> for AppError {
    fn from(value: RuleSetError) -> Self {
        Self::Rules(value)
    }
}

impl From<CostError> for AppError {
    fn from(value: CostError) -> Self {
        Self::Cost(value)
    }
}

impl From<HouseholdError> for AppError {
    fn from(value: HouseholdError) -> Self {
        Self::Household(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
