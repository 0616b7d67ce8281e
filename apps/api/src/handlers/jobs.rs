use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use switchboard_domain::JobId;

use crate::dto::{JobResponse, SaveJobRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_jobs_handler(State(state): State<AppState>) -> Json<Vec<JobResponse>> {
    let jobs = state
        .job_service
        .list_jobs()
        .await
        .into_iter()
        .map(JobResponse::from)
        .collect();

    Json(jobs)
}

pub async fn create_job_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveJobRequest>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let job = state.job_service.create_job(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let job = state.job_service.get_job(JobId::parse(&job_id)?).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn update_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<SaveJobRequest>,
) -> ApiResult<Json<JobResponse>> {
    let job = state
        .job_service
        .update_job(JobId::parse(&job_id)?, payload.into())
        .await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn delete_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.job_service.delete_job(JobId::parse(&job_id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
