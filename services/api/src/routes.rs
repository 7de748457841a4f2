use crate::infra::{deserialize_optional_date, AppState, SurveySettings};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use survey_insights::error::AppError;
use survey_insights::surveys::{
    analyze, render, CategoryPolicy, OverviewStats, ReportMetadata, SurveyAnalysis,
    SurveyResponseImporter,
};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) category_policy: Option<CategoryPolicy>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) generated_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) category_policy: Option<CategoryPolicy>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) path: String,
    pub(crate) generated_on: NaiveDate,
    pub(crate) overview: OverviewStats,
    pub(crate) skipped_answers: usize,
}

/// Report failure that still carries the overview when analysis succeeded
/// and only writing the document failed.
#[derive(Debug)]
pub(crate) struct ReportFailure {
    pub(crate) error: AppError,
    pub(crate) overview: Option<OverviewStats>,
}

impl From<AppError> for ReportFailure {
    fn from(error: AppError) -> Self {
        Self {
            error,
            overview: None,
        }
    }
}

impl IntoResponse for ReportFailure {
    fn into_response(self) -> Response {
        let Some(overview) = self.overview else {
            return self.error.into_response();
        };
        let body = json!({
            "error": self.error.to_string(),
            "kind": self.error.kind(),
            "overview": overview,
        });
        (self.error.status(), Json(body)).into_response()
    }
}

pub(crate) fn survey_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/surveys/analysis", post(analysis_endpoint))
        .route("/api/v1/surveys/report", post(report_endpoint))
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
        json!({ "status": "ready" })
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

fn analyze_csv(csv: String, policy: CategoryPolicy) -> Result<SurveyAnalysis, AppError> {
    let rows = SurveyResponseImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    Ok(analyze(&rows, policy)?)
}

pub(crate) async fn analysis_endpoint(
    Extension(settings): Extension<SurveySettings>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<SurveyAnalysis>, AppError> {
    let AnalysisRequest {
        csv,
        category_policy,
    } = payload;

    let policy = category_policy.unwrap_or(settings.category_policy);
    let analysis = analyze_csv(csv, policy)?;
    Ok(Json(analysis))
}

pub(crate) async fn report_endpoint(
    Extension(settings): Extension<SurveySettings>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ReportFailure> {
    let ReportRequest {
        csv,
        title,
        generated_on,
        category_policy,
    } = payload;

    let policy = category_policy.unwrap_or(settings.category_policy);
    let analysis = analyze_csv(csv, policy)?;

    let generated_on = generated_on.unwrap_or_else(|| Local::now().date_naive());
    let metadata = ReportMetadata::new(
        title.unwrap_or_else(|| settings.report_title.clone()),
        generated_on,
    );
    let path = render(&analysis, &metadata, &settings.output_dir).map_err(|err| {
        ReportFailure {
            error: AppError::from(err),
            overview: Some(analysis.overview),
        }
    })?;
    info!(path = %path.display(), "survey report published");

    Ok(Json(ReportResponse {
        path: path.display().to_string(),
        generated_on,
        overview: analysis.overview,
        skipped_answers: analysis.warnings.len(),
    }))
}
