use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use switchboard_core::AppError;

use crate::dto::GenericMessageResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub const MASTER_PASSWORD_HEADER: &str = "x-switchboard-master-password";

/// Wipes all dashboard data. Once a master password is set it must be sent
/// in the `x-switchboard-master-password` header.
pub async fn clear_data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<GenericMessageResponse>> {
    if state.master_password_service.is_configured().await {
        let password = headers
            .get(MASTER_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("master password required to clear data".to_owned())
            })?;

        if !state.master_password_service.verify(password).await? {
            return Err(AppError::Unauthorized("master password is incorrect".to_owned()).into());
        }
    }

    state.data_reset_service.clear_all().await;
    Ok(Json(GenericMessageResponse {
        message: "all data cleared".to_owned(),
    }))
}
