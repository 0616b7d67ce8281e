use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether a master password is configured.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/master-password-status-response.ts"
)]
pub struct MasterPasswordStatusResponse {
    pub configured: bool,
    pub updated_at: Option<String>,
}

/// Incoming payload for setting or replacing the master password.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-master-password-request.ts"
)]
pub struct SetMasterPasswordRequest {
    /// Required once a password exists.
    #[serde(default)]
    pub current_password: Option<String>,
    pub new_password: String,
}

/// Incoming payload for checking a master password.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/verify-master-password-request.ts"
)]
pub struct VerifyMasterPasswordRequest {
    pub password: String,
}

/// Result of a master password check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/verify-master-password-response.ts"
)]
pub struct VerifyMasterPasswordResponse {
    pub valid: bool,
}

/// Incoming payload for a component name suggestion.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/suggest-component-name-request.ts"
)]
pub struct SuggestComponentNameRequest {
    pub description: String,
}

/// Suggested component name.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/suggest-component-name-response.ts"
)]
pub struct SuggestComponentNameResponse {
    pub name: String,
}
