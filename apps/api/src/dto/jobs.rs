use serde::{Deserialize, Serialize};
use switchboard_application::SaveJobInput;
use switchboard_domain::JobDefinition;
use ts_rs::TS;

/// Incoming payload for job create and update.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-job-request.ts"
)]
pub struct SaveJobRequest {
    pub name: String,
    pub command: String,
    pub template: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<SaveJobRequest> for SaveJobInput {
    fn from(value: SaveJobRequest) -> Self {
        Self {
            name: value.name,
            command: value.command,
            template: value.template,
            description: value.description,
        }
    }
}

/// API representation of a job definition.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/job-response.ts"
)]
pub struct JobResponse {
    pub id: String,
    pub name: String,
    pub command: String,
    pub template: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<JobDefinition> for JobResponse {
    fn from(value: JobDefinition) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            command: value.command().as_str().to_owned(),
            template: value.template().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
