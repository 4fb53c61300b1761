//! Report API Handlers
//!
//! HTTP endpoints for submitting and polling population reports.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use popreport_core::domain::job::JobStatus;
use popreport_core::dto::report::{ReportParams, ReportResponse};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::job_service;

/// POST /init-population-report/
/// Validate and queue a new report job
pub async fn init_report(
    State(state): State<AppState>,
    body: Result<Json<ReportParams>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ReportResponse>)> {
    let Json(params) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::debug!(
        "Report requested at lon={}, lat={}, radius={}",
        params.longitude,
        params.latitude,
        params.radius
    );

    let job = job_service::submit_report(state.store.as_ref(), &state.queue, params)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ReportResponse::pending(job.id, job.status)),
    ))
}

/// GET /population-report/{id}/
/// Report status, with the result once the job is finished
pub async fn get_report(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<(StatusCode, Json<ReportResponse>)> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::debug!("Polling report job: {}", id);

    let job = job_service::poll_report(state.store.as_ref(), id)?;

    if job.status.is_terminal() {
        Ok((
            StatusCode::OK,
            Json(ReportResponse::completed(job.id, job.status, job.result)),
        ))
    } else {
        // queued and running jobs are both reported as in progress
        Ok((
            StatusCode::ACCEPTED,
            Json(ReportResponse::pending(job.id, JobStatus::Progress)),
        ))
    }
}
