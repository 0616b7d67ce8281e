use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_application::{ComplianceRunReport, RunComplianceInput};
use switchboard_core::{AppError, AppResult};
use switchboard_domain::{
    ComplianceLogEntry, ComplianceLogEntryInput, ComplianceStatus, DeviceId, JobId,
};
use ts_rs::TS;

/// API representation of one compliance log entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/compliance-log-entry-response.ts"
)]
pub struct ComplianceLogEntryResponse {
    pub id: String,
    /// Display label such as `Scan 03`; the newest entry carries the highest number.
    pub scan_id: String,
    pub compliance_name: String,
    pub timestamp: String,
    /// One of `Success`, `Failed`, `Partial Success`.
    pub status: String,
    pub details: String,
    pub devices_count: u32,
    pub jobs_count: u32,
}

impl From<ComplianceLogEntry> for ComplianceLogEntryResponse {
    fn from(value: ComplianceLogEntry) -> Self {
        Self {
            id: value.id().to_string(),
            scan_id: value.scan_id().to_string(),
            compliance_name: value.compliance_name().as_str().to_owned(),
            timestamp: value.timestamp().to_rfc3339(),
            status: value.status().as_str().to_owned(),
            details: value.details().to_owned(),
            devices_count: value.devices_count(),
            jobs_count: value.jobs_count(),
        }
    }
}

/// Incoming payload for recording an externally executed run.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/append-compliance-log-request.ts"
)]
pub struct AppendComplianceLogRequest {
    pub compliance_name: String,
    pub status: String,
    #[serde(default)]
    pub details: String,
    pub devices_count: u32,
    pub jobs_count: u32,
    /// RFC 3339 completion instant; defaults to the time of the request.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl TryFrom<AppendComplianceLogRequest> for ComplianceLogEntryInput {
    type Error = AppError;

    fn try_from(value: AppendComplianceLogRequest) -> Result<Self, Self::Error> {
        let input = Self::new(
            value.compliance_name,
            ComplianceStatus::from_transport(value.status.as_str())?,
            value.details,
            value.devices_count,
            value.jobs_count,
        )?;

        match value.timestamp {
            Some(timestamp) => Ok(input.with_timestamp(parse_instant("timestamp", &timestamp)?)),
            None => Ok(input),
        }
    }
}

/// Incoming payload for an on-demand compliance run.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-compliance-request.ts"
)]
pub struct RunComplianceRequest {
    pub compliance_name: String,
    pub device_ids: Vec<String>,
    pub job_ids: Vec<String>,
}

impl TryFrom<RunComplianceRequest> for RunComplianceInput {
    type Error = AppError;

    fn try_from(value: RunComplianceRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            compliance_name: value.compliance_name,
            device_ids: parse_device_ids(&value.device_ids)?,
            job_ids: parse_job_ids(&value.job_ids)?,
        })
    }
}

/// Result of an on-demand compliance run.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/compliance-run-response.ts"
)]
pub struct ComplianceRunResponse {
    pub compliance_name: String,
    pub status: String,
    pub details: String,
    pub devices_count: u32,
    pub jobs_count: u32,
    pub passed_devices: u32,
    pub completed_at: String,
}

impl From<ComplianceRunReport> for ComplianceRunResponse {
    fn from(value: ComplianceRunReport) -> Self {
        Self {
            compliance_name: value.compliance_name,
            status: value.status.as_str().to_owned(),
            details: value.details,
            devices_count: value.devices_count,
            jobs_count: value.jobs_count,
            passed_devices: value.passed_devices,
            completed_at: value.completed_at.to_rfc3339(),
        }
    }
}

pub(crate) fn parse_device_ids(values: &[String]) -> AppResult<Vec<DeviceId>> {
    values.iter().map(|value| DeviceId::parse(value)).collect()
}

pub(crate) fn parse_job_ids(values: &[String]) -> AppResult<Vec<JobId>> {
    values.iter().map(|value| JobId::parse(value)).collect()
}

pub(crate) fn parse_instant(field_name: &str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Validation(format!("{field_name} must be an RFC 3339 instant: {error}"))
        })
}
