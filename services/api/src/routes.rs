use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use sales_comp::compensation::{
    compensation_router, import_deals, CompensationService, ImportReport, Money, Pipeline,
    PipelineStore, PipelineView,
};
use sales_comp::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineReportRequest {
    #[serde(default)]
    pub(crate) contract_values: Vec<Money>,
    #[serde(default)]
    pub(crate) csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PipelineReportResponse {
    pub(crate) rejected_values: Vec<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) import: Option<ImportReport>,
    #[serde(flatten)]
    pub(crate) pipeline: PipelineView,
}

pub(crate) fn with_compensation_routes<S>(service: Arc<CompensationService<S>>) -> axum::Router
where
    S: PipelineStore + 'static,
{
    compensation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/closer/report",
            axum::routing::post(pipeline_report_endpoint),
        )
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

/// One-shot pipeline evaluation that does not touch any session.
pub(crate) async fn pipeline_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PipelineReportRequest>,
) -> Result<Json<PipelineReportResponse>, AppError> {
    let PipelineReportRequest {
        contract_values,
        csv,
    } = payload;

    let mut pipeline = Pipeline::new(state.policy.closer.clone());
    let mut rejected_values = Vec::new();
    for value in contract_values {
        if pipeline.add(value).is_err() {
            rejected_values.push(value);
        }
    }

    let import = match csv {
        Some(csv) => {
            let reader = Cursor::new(csv.into_bytes());
            Some(import_deals(reader, &mut pipeline, &state.currency)?)
        }
        None => None,
    };

    debug!(
        deals = pipeline.len(),
        rejected = rejected_values.len(),
        "pipeline report computed"
    );

    Ok(Json(PipelineReportResponse {
        rejected_values,
        import,
        pipeline: pipeline.view(&state.currency),
    }))
}
