use std::sync::Arc;

use chrono::{DateTime, Utc};
use switchboard_core::{AppError, AppResult};
use switchboard_domain::{
    Device, DeviceId, JobDefinition, JobId, ScheduleRecurrence, ScheduledJob, ScheduledJobId,
};
use tracing::{info, warn};

use crate::device_service::DeviceService;
use crate::job_service::JobService;
use crate::persisted_collection::PersistedCollection;

/// Upper bound for schedules handed out by one claim.
pub const MAX_SCHEDULE_CLAIM_LIMIT: usize = 50;

/// Input payload for scheduling a compliance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleJobInput {
    /// Label stored with produced log entries.
    pub compliance_name: String,
    /// Devices to check.
    pub device_ids: Vec<DeviceId>,
    /// Jobs to execute.
    pub job_ids: Vec<JobId>,
    /// Repeat policy.
    pub recurrence: ScheduleRecurrence,
    /// First due instant; defaults to now.
    pub next_run_at: Option<DateTime<Utc>>,
}

/// A due schedule with its targets resolved for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedScheduledJob {
    /// Claimed schedule.
    pub scheduled_job_id: ScheduledJobId,
    /// Label for the produced log entry.
    pub compliance_name: String,
    /// Instant the run was due.
    pub scheduled_for: DateTime<Utc>,
    /// Devices that still exist.
    pub devices: Vec<Device>,
    /// Jobs that still exist.
    pub jobs: Vec<JobDefinition>,
}

/// Application service for scheduled compliance runs.
#[derive(Clone)]
pub struct ScheduleService {
    schedules: Arc<PersistedCollection<ScheduledJob>>,
    device_service: DeviceService,
    job_service: JobService,
}

impl ScheduleService {
    /// Creates a schedule service.
    #[must_use]
    pub fn new(
        schedules: Arc<PersistedCollection<ScheduledJob>>,
        device_service: DeviceService,
        job_service: JobService,
    ) -> Self {
        Self {
            schedules,
            device_service,
            job_service,
        }
    }

    /// Lists schedules ordered by next due instant.
    pub async fn list_scheduled_jobs(&self) -> Vec<ScheduledJob> {
        let mut schedules = self.schedules.snapshot().await;
        schedules.sort_by_key(ScheduledJob::next_run_at);
        schedules
    }

    /// Schedules a compliance run against existing devices and jobs.
    pub async fn schedule_job(&self, input: ScheduleJobInput) -> AppResult<ScheduledJob> {
        self.device_service.find_devices(&input.device_ids).await?;
        self.job_service.find_jobs(&input.job_ids).await?;

        let now = Utc::now();
        let schedule = ScheduledJob::new(
            ScheduledJobId::new(),
            input.compliance_name,
            input.device_ids,
            input.job_ids,
            input.recurrence,
            input.next_run_at.unwrap_or(now),
            now,
        )?;

        let created = schedule.clone();
        self.schedules
            .mutate(move |schedules| {
                schedules.push(schedule);
                Ok(())
            })
            .await?;

        info!(
            scheduled_job_id = %created.id(),
            recurrence = created.recurrence().as_str(),
            next_run_at = %created.next_run_at(),
            "compliance run scheduled"
        );
        Ok(created)
    }

    /// Removes a schedule.
    pub async fn cancel_scheduled_job(&self, scheduled_job_id: ScheduledJobId) -> AppResult<()> {
        self.schedules
            .mutate(move |schedules| {
                let before = schedules.len();
                schedules.retain(|schedule| schedule.id() != scheduled_job_id);
                if schedules.len() == before {
                    return Err(AppError::NotFound(format!(
                        "scheduled job '{scheduled_job_id}' does not exist"
                    )));
                }
                Ok(())
            })
            .await
    }

    /// Hands out up to `limit` due schedules, oldest due first.
    ///
    /// One-off schedules are removed and recurring ones advance past `now`.
    /// Schedules whose devices or jobs were all deleted are dropped.
    pub async fn claim_due_jobs(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<ClaimedScheduledJob>> {
        let has_due = self
            .schedules
            .snapshot()
            .await
            .iter()
            .any(|schedule| schedule.is_due(now));
        if !has_due {
            return Ok(Vec::new());
        }

        let limit = limit.clamp(1, MAX_SCHEDULE_CLAIM_LIMIT);
        // Targets resolve against devices and jobs as of this point. A delete
        // landing during the claim is dropped by the next claim.
        let devices = self.device_service.list_devices().await;
        let jobs = self.job_service.list_jobs().await;

        let (claimed, dropped) = self
            .schedules
            .mutate(move |schedules| {
                let mut due: Vec<(DateTime<Utc>, ScheduledJobId)> = schedules
                    .iter()
                    .filter(|schedule| schedule.is_due(now))
                    .map(|schedule| (schedule.next_run_at(), schedule.id()))
                    .collect();
                due.sort_by_key(|(next_run_at, _)| *next_run_at);

                let mut claimed = Vec::new();
                let mut dropped = Vec::new();
                for (_, scheduled_job_id) in due {
                    if claimed.len() == limit {
                        break;
                    }

                    let Some(position) = schedules
                        .iter()
                        .position(|schedule| schedule.id() == scheduled_job_id)
                    else {
                        continue;
                    };
                    let schedule = schedules[position].clone();

                    let target_devices: Vec<Device> = schedule
                        .device_ids()
                        .iter()
                        .filter_map(|device_id| {
                            devices.iter().find(|device| device.id() == *device_id)
                        })
                        .cloned()
                        .collect();
                    let target_jobs: Vec<JobDefinition> = schedule
                        .job_ids()
                        .iter()
                        .filter_map(|job_id| jobs.iter().find(|job| job.id() == *job_id))
                        .cloned()
                        .collect();

                    if target_devices.is_empty() || target_jobs.is_empty() {
                        schedules.remove(position);
                        dropped.push(scheduled_job_id);
                        continue;
                    }

                    match schedule.advance(now) {
                        Some(next) => schedules[position] = next,
                        None => {
                            schedules.remove(position);
                        }
                    }

                    claimed.push(ClaimedScheduledJob {
                        scheduled_job_id,
                        compliance_name: schedule.compliance_name().as_str().to_owned(),
                        scheduled_for: schedule.next_run_at(),
                        devices: target_devices,
                        jobs: target_jobs,
                    });
                }

                Ok((claimed, dropped))
            })
            .await?;

        for scheduled_job_id in dropped {
            warn!(
                scheduled_job_id = %scheduled_job_id,
                "dropping scheduled job whose devices or jobs no longer exist"
            );
        }

        Ok(claimed)
    }
}

#[cfg(test)]
mod tests;
