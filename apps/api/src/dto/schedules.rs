use serde::{Deserialize, Serialize};
use switchboard_application::ScheduleJobInput;
use switchboard_core::AppError;
use switchboard_domain::{ScheduleRecurrence, ScheduledJob};
use ts_rs::TS;

use super::compliance::{parse_device_ids, parse_instant, parse_job_ids};

/// Incoming payload for scheduling a compliance run.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-scheduled-job-request.ts"
)]
pub struct CreateScheduledJobRequest {
    pub compliance_name: String,
    pub device_ids: Vec<String>,
    pub job_ids: Vec<String>,
    /// One of `once`, `hourly`, `daily`, `weekly`.
    pub recurrence: String,
    #[serde(default)]
    pub next_run_at: Option<String>,
}

impl TryFrom<CreateScheduledJobRequest> for ScheduleJobInput {
    type Error = AppError;

    fn try_from(value: CreateScheduledJobRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            compliance_name: value.compliance_name,
            device_ids: parse_device_ids(&value.device_ids)?,
            job_ids: parse_job_ids(&value.job_ids)?,
            recurrence: value.recurrence.parse::<ScheduleRecurrence>()?,
            next_run_at: value
                .next_run_at
                .as_deref()
                .map(|instant| parse_instant("nextRunAt", instant))
                .transpose()?,
        })
    }
}

/// API representation of a scheduled compliance run.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scheduled-job-response.ts"
)]
pub struct ScheduledJobResponse {
    pub id: String,
    pub compliance_name: String,
    pub device_ids: Vec<String>,
    pub job_ids: Vec<String>,
    pub recurrence: String,
    pub next_run_at: String,
    pub last_run_at: Option<String>,
    pub created_at: String,
}

impl From<ScheduledJob> for ScheduledJobResponse {
    fn from(value: ScheduledJob) -> Self {
        Self {
            id: value.id().to_string(),
            compliance_name: value.compliance_name().as_str().to_owned(),
            device_ids: value.device_ids().iter().map(ToString::to_string).collect(),
            job_ids: value.job_ids().iter().map(ToString::to_string).collect(),
            recurrence: value.recurrence().as_str().to_owned(),
            next_run_at: value.next_run_at().to_rfc3339(),
            last_run_at: value.last_run_at().map(|instant| instant.to_rfc3339()),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}
