use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use survey_insights::config::AppConfig;
use survey_insights::surveys::CategoryPolicy;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-request defaults for the survey endpoints. Each request builds its own
/// analysis from these; nothing mutable is shared between requests.
#[derive(Debug, Clone)]
pub(crate) struct SurveySettings {
    pub(crate) output_dir: PathBuf,
    pub(crate) report_title: String,
    pub(crate) category_policy: CategoryPolicy,
}

impl SurveySettings {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.report.output_dir.clone(),
            report_title: config.report.title.clone(),
            category_policy: config.analysis.category_policy,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_policy(raw: &str) -> Result<CategoryPolicy, String> {
    CategoryPolicy::parse(raw)
        .ok_or_else(|| format!("unknown category policy '{raw}' (first-answer | every-answer)"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
