use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use switchboard_domain::DeviceId;

use crate::dto::{DeviceResponse, SaveDeviceRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_devices_handler(State(state): State<AppState>) -> Json<Vec<DeviceResponse>> {
    let devices = state
        .device_service
        .list_devices()
        .await
        .into_iter()
        .map(DeviceResponse::from)
        .collect();

    Json(devices)
}

pub async fn create_device_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveDeviceRequest>,
) -> ApiResult<(StatusCode, Json<DeviceResponse>)> {
    let device = state.device_service.create_device(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(DeviceResponse::from(device))))
}

pub async fn get_device_handler(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = state
        .device_service
        .get_device(DeviceId::parse(&device_id)?)
        .await?;
    Ok(Json(DeviceResponse::from(device)))
}

pub async fn update_device_handler(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Json(payload): Json<SaveDeviceRequest>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = state
        .device_service
        .update_device(DeviceId::parse(&device_id)?, payload.into())
        .await?;
    Ok(Json(DeviceResponse::from(device)))
}

pub async fn delete_device_handler(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .device_service
        .delete_device(DeviceId::parse(&device_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_device_reachability_handler(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = state
        .device_service
        .check_reachability(DeviceId::parse(&device_id)?)
        .await?;
    Ok(Json(DeviceResponse::from(device)))
}

pub async fn check_all_reachability_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DeviceResponse>>> {
    let devices = state
        .device_service
        .check_all_reachability()
        .await?
        .into_iter()
        .map(DeviceResponse::from)
        .collect();
    Ok(Json(devices))
}
