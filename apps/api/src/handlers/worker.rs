use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use chrono::Utc;
use switchboard_domain::ComplianceLogEntryInput;
use tracing::info;

use crate::dto::{
    AppendComplianceLogRequest, ClaimScheduledJobsRequest, ClaimedScheduledJobResponse,
    ClaimedScheduledJobsResponse,
};
use crate::error::ApiResult;
use crate::middleware::WorkerIdentity;
use crate::state::AppState;

const DEFAULT_CLAIM_LIMIT: usize = 5;

pub async fn claim_scheduled_jobs_handler(
    State(state): State<AppState>,
    Extension(worker): Extension<WorkerIdentity>,
    Json(payload): Json<ClaimScheduledJobsRequest>,
) -> ApiResult<Json<ClaimedScheduledJobsResponse>> {
    let jobs: Vec<ClaimedScheduledJobResponse> = state
        .schedule_service
        .claim_due_jobs(Utc::now(), payload.limit.unwrap_or(DEFAULT_CLAIM_LIMIT))
        .await?
        .into_iter()
        .map(ClaimedScheduledJobResponse::from)
        .collect();

    if !jobs.is_empty() {
        info!(worker_id = worker.worker_id(), claimed = jobs.len(), "scheduled jobs claimed");
    }

    Ok(Json(ClaimedScheduledJobsResponse { jobs }))
}

pub async fn record_worker_compliance_log_handler(
    State(state): State<AppState>,
    Extension(worker): Extension<WorkerIdentity>,
    Json(payload): Json<AppendComplianceLogRequest>,
) -> ApiResult<StatusCode> {
    let input = ComplianceLogEntryInput::try_from(payload)?;
    info!(worker_id = worker.worker_id(), "worker reported compliance run");
    state.compliance_run_service.record_completed_run(input).await;
    Ok(StatusCode::ACCEPTED)
}
