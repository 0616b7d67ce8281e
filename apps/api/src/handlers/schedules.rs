use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use switchboard_application::ScheduleJobInput;
use switchboard_domain::ScheduledJobId;

use crate::dto::{CreateScheduledJobRequest, ScheduledJobResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_scheduled_jobs_handler(
    State(state): State<AppState>,
) -> Json<Vec<ScheduledJobResponse>> {
    Json(
        state
            .schedule_service
            .list_scheduled_jobs()
            .await
            .into_iter()
            .map(ScheduledJobResponse::from)
            .collect(),
    )
}

pub async fn create_scheduled_job_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduledJobRequest>,
) -> ApiResult<(StatusCode, Json<ScheduledJobResponse>)> {
    let schedule = state
        .schedule_service
        .schedule_job(ScheduleJobInput::try_from(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(ScheduledJobResponse::from(schedule))))
}

pub async fn cancel_scheduled_job_handler(
    State(state): State<AppState>,
    Path(scheduled_job_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .schedule_service
        .cancel_scheduled_job(ScheduledJobId::parse(&scheduled_job_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
