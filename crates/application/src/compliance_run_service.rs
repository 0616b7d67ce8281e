use std::sync::Arc;

use chrono::{DateTime, Utc};
use switchboard_core::{AppResult, NonEmptyString};
use switchboard_domain::{
    ComplianceLogEntryInput, ComplianceStatus, DeviceId, JobId, simulate_compliance_run,
};
use tracing::info;

use crate::compliance_log_store::ComplianceLogStore;
use crate::device_service::DeviceService;
use crate::job_service::JobService;
use crate::simulation_ports::RandomSource;

/// Input payload for an on-demand compliance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunComplianceInput {
    /// Label stored with the resulting log entry.
    pub compliance_name: String,
    /// Devices to check.
    pub device_ids: Vec<DeviceId>,
    /// Jobs to execute on each device.
    pub job_ids: Vec<JobId>,
}

/// Summary of a finished compliance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRunReport {
    /// Label stored with the log entry.
    pub compliance_name: String,
    /// Aggregate outcome.
    pub status: ComplianceStatus,
    /// Per-device output.
    pub details: String,
    /// Devices checked.
    pub devices_count: u32,
    /// Jobs executed per device.
    pub jobs_count: u32,
    /// Devices that passed.
    pub passed_devices: u32,
    /// Completion instant recorded in the log.
    pub completed_at: DateTime<Utc>,
}

/// Executes simulated compliance runs and records their outcome.
#[derive(Clone)]
pub struct ComplianceRunService {
    device_service: DeviceService,
    job_service: JobService,
    log_store: ComplianceLogStore,
    random_source: Arc<dyn RandomSource>,
}

impl ComplianceRunService {
    /// Creates a run service.
    #[must_use]
    pub fn new(
        device_service: DeviceService,
        job_service: JobService,
        log_store: ComplianceLogStore,
        random_source: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            device_service,
            job_service,
            log_store,
            random_source,
        }
    }

    /// Runs every selected job against every selected device and logs the result.
    pub async fn run_compliance(
        &self,
        input: RunComplianceInput,
    ) -> AppResult<ComplianceRunReport> {
        let compliance_name = NonEmptyString::for_field("compliance name", input.compliance_name)?;
        let devices = self.device_service.find_devices(&input.device_ids).await?;
        let jobs = self.job_service.find_jobs(&input.job_ids).await?;

        let outcome = simulate_compliance_run(&devices, &jobs, || self.random_source.next_unit())?;
        let completed_at = Utc::now();
        self.log_store
            .append(outcome.to_log_input(compliance_name.as_str(), completed_at)?)
            .await;

        info!(
            compliance_name = %compliance_name,
            status = outcome.status().as_str(),
            devices = outcome.devices_count(),
            passed = outcome.passed_devices(),
            "compliance run finished"
        );

        Ok(ComplianceRunReport {
            compliance_name: compliance_name.into(),
            status: outcome.status(),
            details: outcome.details().to_owned(),
            devices_count: outcome.devices_count(),
            jobs_count: outcome.jobs_count(),
            passed_devices: outcome.passed_devices(),
            completed_at,
        })
    }

    /// Records a run executed elsewhere, such as by the scheduled-run worker.
    pub async fn record_completed_run(&self, input: ComplianceLogEntryInput) {
        info!(
            compliance_name = %input.compliance_name(),
            status = input.status().as_str(),
            "recording externally executed compliance run"
        );
        self.log_store.append(input).await;
    }
}
