use serde::{Deserialize, Serialize};
use switchboard_application::SaveDeviceInput;
use switchboard_domain::Device;
use ts_rs::TS;

/// Incoming payload for device create and update.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-device-request.ts"
)]
pub struct SaveDeviceRequest {
    pub name: String,
    pub ip_address: String,
    pub device_type: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<SaveDeviceRequest> for SaveDeviceInput {
    fn from(value: SaveDeviceRequest) -> Self {
        Self {
            name: value.name,
            ip_address: value.ip_address,
            device_type: value.device_type,
            location: value.location,
        }
    }
}

/// API representation of a managed device.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/device-response.ts"
)]
pub struct DeviceResponse {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub device_type: String,
    pub location: Option<String>,
    /// One of `unknown`, `reachable`, `unreachable`.
    pub reachability: String,
    pub last_checked_at: Option<String>,
    pub created_at: String,
}

impl From<Device> for DeviceResponse {
    fn from(value: Device) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            ip_address: value.ip_address().to_string(),
            device_type: value.device_type().as_str().to_owned(),
            location: value.location().map(ToOwned::to_owned),
            reachability: value.reachability().as_str().to_owned(),
            last_checked_at: value.last_checked_at().map(|instant| instant.to_rfc3339()),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
