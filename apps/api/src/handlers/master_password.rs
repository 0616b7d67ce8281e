use axum::Json;
use axum::extract::State;

use crate::dto::{
    GenericMessageResponse, MasterPasswordStatusResponse, SetMasterPasswordRequest,
    VerifyMasterPasswordRequest, VerifyMasterPasswordResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn master_password_status_handler(
    State(state): State<AppState>,
) -> Json<MasterPasswordStatusResponse> {
    let service = &state.master_password_service;
    Json(MasterPasswordStatusResponse {
        configured: service.is_configured().await,
        updated_at: service
            .updated_at()
            .await
            .map(|instant| instant.to_rfc3339()),
    })
}

pub async fn set_master_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<SetMasterPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .master_password_service
        .set_password(
            payload.current_password.as_deref(),
            payload.new_password.as_str(),
        )
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "master password updated".to_owned(),
    }))
}

pub async fn verify_master_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyMasterPasswordRequest>,
) -> ApiResult<Json<VerifyMasterPasswordResponse>> {
    let valid = state
        .master_password_service
        .verify(payload.password.as_str())
        .await?;
    Ok(Json(VerifyMasterPasswordResponse { valid }))
}
