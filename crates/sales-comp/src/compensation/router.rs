use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::head::HeadInputs;
use super::money::Money;
use super::scorecard::ScorecardCriteria;
use super::sdr::SdrCounters;
use super::service::{CompensationService, ServiceError};
use super::store::{PipelineStore, SessionId, StoreError};

#[derive(Debug, Deserialize)]
pub(crate) struct ContractValueRequest {
    pub(crate) contract_value: Money,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeadRequest {
    pub(crate) credential: String,
    #[serde(default)]
    pub(crate) session_id: Option<SessionId>,
    #[serde(default)]
    pub(crate) closer_revenue: Money,
    #[serde(default)]
    pub(crate) closer_final_commission: Money,
    #[serde(default)]
    pub(crate) high_score_delivered: u32,
    #[serde(default)]
    pub(crate) high_score_target: u32,
}

/// Router builder exposing the rule engine to the presentation layer.
pub fn compensation_router<S>(service: Arc<CompensationService<S>>) -> Router
where
    S: PipelineStore + 'static,
{
    Router::new()
        .route("/api/v1/closer/classify", post(classify_handler::<S>))
        .route("/api/v1/pipelines", post(open_session_handler::<S>))
        .route(
            "/api/v1/pipelines/:session_id",
            get(pipeline_handler::<S>).delete(close_session_handler::<S>),
        )
        .route(
            "/api/v1/pipelines/:session_id/deals",
            post(add_deal_handler::<S>).delete(clear_pipeline_handler::<S>),
        )
        .route("/api/v1/sdr/evaluate", post(sdr_handler::<S>))
        .route("/api/v1/scorecard", post(scorecard_handler::<S>))
        .route("/api/v1/scorecard/rubric", get(rubric_handler::<S>))
        .route("/api/v1/head/evaluate", post(head_handler::<S>))
        .with_state(service)
}

pub(crate) async fn classify_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Json(request): Json<ContractValueRequest>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.classify(request.contract_value) {
        Ok(classification) => (StatusCode::OK, Json(classification)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn open_session_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.open_session() {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn pipeline_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.pipeline(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_session_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_deal_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<ContractValueRequest>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.add_deal(&SessionId(session_id), request.contract_value) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_pipeline_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: PipelineStore + 'static,
{
    match service.clear_pipeline(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn sdr_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Json(counters): Json<SdrCounters>,
) -> Response
where
    S: PipelineStore + 'static,
{
    let breakdown = service.evaluate_sdr(counters);
    (StatusCode::OK, Json(breakdown)).into_response()
}

pub(crate) async fn scorecard_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Json(criteria): Json<ScorecardCriteria>,
) -> Response
where
    S: PipelineStore + 'static,
{
    let result = service.score_lead(&criteria);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn rubric_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
) -> Response
where
    S: PipelineStore + 'static,
{
    (StatusCode::OK, Json(service.rubric())).into_response()
}

pub(crate) async fn head_handler<S>(
    State(service): State<Arc<CompensationService<S>>>,
    Json(request): Json<HeadRequest>,
) -> Response
where
    S: PipelineStore + 'static,
{
    let result = match &request.session_id {
        Some(session_id) => service.evaluate_head_for_session(
            &request.credential,
            session_id,
            request.high_score_delivered,
            request.high_score_target,
        ),
        None => {
            let inputs = HeadInputs {
                closer_revenue: request.closer_revenue,
                closer_final_commission: request.closer_final_commission,
                high_score_delivered: request.high_score_delivered,
                high_score_target: request.high_score_target,
            };
            service.evaluate_head(&request.credential, &inputs)
        }
    };

    match result {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::ContractValue(_) | ServiceError::Pipeline(_) | ServiceError::Head(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Access(_) => StatusCode::FORBIDDEN,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
