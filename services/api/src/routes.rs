use std::sync::Arc;

use crate::infra::{AppState, ServiceContext};
use ats_fit::analysis::{assess_candidate, AnalysisReport, AnalysisRequest, CandidateAssessment, RecordId};
use ats_fit::connectors::ConnectorKind;
use ats_fit::error::AppError;
use ats_fit::gateway::{match_offers, rank_candidates};
use ats_fit::propagation::{StatusReceipt, StatusUpdate};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

type Context = State<Arc<ServiceContext>>;

pub(crate) fn with_service_routes(context: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/analyze", get(gateway_analysis).post(analyze_payload))
        .route("/process", post(process_candidate))
        .route("/fetch-candidates", get(fetch_candidates))
        .route("/fetch-offers", get(fetch_offers))
        .route("/bamboohr/update-status", post(update_status))
        .route("/fetch-bamboohr-data", get(fetch_bamboohr_data))
        .route("/fetch-workable-data", get(fetch_workable_data))
        .route("/fetch-ceipal-candidates", get(fetch_ceipal_candidates))
        .route("/fetch-hrflow-candidates", get(fetch_hrflow_candidates))
        .with_state(context)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "ok": true, "message": "ats-fit ready and listening" }))
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

pub(crate) async fn analyze_payload(
    State(context): Context,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let Json(request) = payload?;
    Ok(Json(context.pipeline.analyze(request)))
}

pub(crate) async fn gateway_analysis(State(context): Context) -> Result<Json<Value>, AppError> {
    let (candidates, offers) = tokio::join!(context.gateway.candidates(), context.gateway.offers());
    let (candidates, offers) = (candidates?, offers?);

    let results = match_offers(&candidates, &offers.offers, context.gateway_scorer.as_ref());
    Ok(Json(json!({ "analyzed": results.len(), "results": results })))
}

pub(crate) async fn fetch_candidates(State(context): Context) -> Result<Json<Value>, AppError> {
    let candidates = context.gateway.candidates().await?;
    let results = rank_candidates(&candidates, context.gateway_scorer.as_ref());
    Ok(Json(json!({ "total": results.len(), "results": results })))
}

pub(crate) async fn fetch_offers(State(context): Context) -> Result<Json<Value>, AppError> {
    let page = context.gateway.offers().await?;
    Ok(Json(json!({ "total": page.total, "offers": page.offers })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessRequest {
    #[serde(default)]
    data: Option<Value>,
}

pub(crate) async fn process_candidate(
    State(context): Context,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<CandidateAssessment>, AppError> {
    let Json(request) = payload?;
    let data = request
        .data
        .as_ref()
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::bad_request("Missing candidate data"))?;

    Ok(Json(assess_candidate(data, context.baseline_scorer.as_ref())))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    #[serde(default)]
    application_id: Option<Value>,
    #[serde(default)]
    status_id: Option<Value>,
}

pub(crate) async fn update_status(
    State(context): Context,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<StatusReceipt>, AppError> {
    let Json(request) = payload?;
    let application_id = request.application_id.as_ref().and_then(RecordId::from_value);
    let status_id = request
        .status_id
        .as_ref()
        .and_then(Value::as_u64)
        .filter(|status| *status > 0)
        .and_then(|status| u32::try_from(status).ok());

    let (Some(application_id), Some(status_id)) = (application_id, status_id) else {
        return Err(AppError::bad_request("application_id and status_id required"));
    };

    let update = StatusUpdate {
        application_id,
        status_id,
    };
    match context.status_client.update_status(&update).await {
        Ok(receipt) => {
            info!(
                application_id = %receipt.application_id,
                http_status = receipt.http_status,
                ok = receipt.ok,
                "status update forwarded"
            );
            Ok(Json(receipt))
        }
        Err(err) => {
            error!(application_id = %update.application_id, error = %err, "status update failed");
            Err(err.into())
        }
    }
}

async fn run_connector(context: &ServiceContext, kind: ConnectorKind) -> Result<Json<Value>, AppError> {
    let payload = context.connectors.run(kind).await?;
    Ok(Json(payload))
}

pub(crate) async fn fetch_bamboohr_data(State(context): Context) -> Result<Json<Value>, AppError> {
    run_connector(&context, ConnectorKind::BambooHr).await
}

pub(crate) async fn fetch_workable_data(State(context): Context) -> Result<Json<Value>, AppError> {
    run_connector(&context, ConnectorKind::Workable).await
}

pub(crate) async fn fetch_ceipal_candidates(State(context): Context) -> Result<Json<Value>, AppError> {
    run_connector(&context, ConnectorKind::Ceipal).await
}

pub(crate) async fn fetch_hrflow_candidates(State(context): Context) -> Result<Json<Value>, AppError> {
    run_connector(&context, ConnectorKind::HrFlow).await
}
