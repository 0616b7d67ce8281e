use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_application::ClaimedScheduledJob;
use switchboard_domain::{Device, JobDefinition};

#[derive(Debug, Default, Deserialize)]
pub struct ClaimScheduledJobsRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ClaimedScheduledJobsResponse {
    pub jobs: Vec<ClaimedScheduledJobResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedScheduledJobResponse {
    pub scheduled_job_id: String,
    pub compliance_name: String,
    pub scheduled_for: DateTime<Utc>,
    pub devices: Vec<Device>,
    pub jobs: Vec<JobDefinition>,
}

impl From<ClaimedScheduledJob> for ClaimedScheduledJobResponse {
    fn from(value: ClaimedScheduledJob) -> Self {
        Self {
            scheduled_job_id: value.scheduled_job_id.to_string(),
            compliance_name: value.compliance_name,
            scheduled_for: value.scheduled_for,
            devices: value.devices,
            jobs: value.jobs,
        }
    }
}
