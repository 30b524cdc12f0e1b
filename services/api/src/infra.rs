use chrono::NaiveDate;
use credito::config::ScoringConfig;
use credito::workflows::lending::applications::{CriteriaError, ScoringCriteria};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Criteria from `CREDIT_CRITERIA_PATH` when configured, otherwise the built-in table.
pub(crate) fn load_criteria(config: &ScoringConfig) -> Result<ScoringCriteria, CriteriaError> {
    match &config.criteria_path {
        Some(path) => {
            let criteria = ScoringCriteria::from_path(path)?;
            info!(path = %path.display(), "loaded scoring criteria");
            Ok(criteria)
        }
        None => Ok(ScoringCriteria::default()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
