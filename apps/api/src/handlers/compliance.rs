use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use switchboard_application::RunComplianceInput;
use switchboard_domain::ComplianceLogEntryInput;

use crate::dto::{
    AppendComplianceLogRequest, ComplianceLogEntryResponse, ComplianceRunResponse,
    RunComplianceRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_compliance_logs_handler(
    State(state): State<AppState>,
) -> Json<Vec<ComplianceLogEntryResponse>> {
    Json(
        state
            .compliance_log_store
            .get()
            .await
            .into_iter()
            .map(ComplianceLogEntryResponse::from)
            .collect(),
    )
}

/// Records a run and answers with the relabeled log.
pub async fn append_compliance_log_handler(
    State(state): State<AppState>,
    Json(payload): Json<AppendComplianceLogRequest>,
) -> ApiResult<(StatusCode, Json<Vec<ComplianceLogEntryResponse>>)> {
    let input = ComplianceLogEntryInput::try_from(payload)?;
    state.compliance_log_store.append(input).await;

    let entries = state
        .compliance_log_store
        .get()
        .await
        .into_iter()
        .map(ComplianceLogEntryResponse::from)
        .collect();
    Ok((StatusCode::CREATED, Json(entries)))
}

pub async fn run_compliance_handler(
    State(state): State<AppState>,
    Json(payload): Json<RunComplianceRequest>,
) -> ApiResult<Json<ComplianceRunResponse>> {
    let report = state
        .compliance_run_service
        .run_compliance(RunComplianceInput::try_from(payload)?)
        .await?;
    Ok(Json(ComplianceRunResponse::from(report)))
}
