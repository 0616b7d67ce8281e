use axum::Json;
use axum::extract::State;

use crate::dto::{SuggestComponentNameRequest, SuggestComponentNameResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn suggest_component_name_handler(
    State(state): State<AppState>,
    Json(payload): Json<SuggestComponentNameRequest>,
) -> ApiResult<Json<SuggestComponentNameResponse>> {
    let name = state
        .component_name_service
        .suggest_component_name(payload.description.as_str())
        .await?;
    Ok(Json(SuggestComponentNameResponse { name }))
}
