use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::{DeviceId, JobId};

/// Stable identifier of a scheduled compliance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduledJobId(Uuid);

impl ScheduledJobId {
    /// Creates a random schedule identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a transport value into a schedule identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value).map(Self).map_err(|error| {
            AppError::Validation(format!("invalid scheduled job id '{value}': {error}"))
        })
    }
}

impl Default for ScheduledJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScheduledJobId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// How often a scheduled run repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleRecurrence {
    /// Runs a single time and is then removed.
    Once,
    /// Repeats every hour.
    Hourly,
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
}

impl ScheduleRecurrence {
    /// Returns a stable storage value for this recurrence.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Returns the repeat interval, if any.
    #[must_use]
    pub fn interval(&self) -> Option<TimeDelta> {
        match self {
            Self::Once => None,
            Self::Hourly => Some(TimeDelta::hours(1)),
            Self::Daily => Some(TimeDelta::days(1)),
            Self::Weekly => Some(TimeDelta::weeks(1)),
        }
    }
}

impl FromStr for ScheduleRecurrence {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "once" => Ok(Self::Once),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(AppError::Validation(format!(
                "unknown schedule recurrence '{value}'"
            ))),
        }
    }
}

/// A compliance run queued for future execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledJob {
    id: ScheduledJobId,
    compliance_name: NonEmptyString,
    device_ids: Vec<DeviceId>,
    job_ids: Vec<JobId>,
    recurrence: ScheduleRecurrence,
    next_run_at: DateTime<Utc>,
    last_run_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ScheduledJob {
    /// Creates a validated schedule. Duplicate ids are collapsed in first-seen order.
    pub fn new(
        id: ScheduledJobId,
        compliance_name: impl Into<String>,
        device_ids: Vec<DeviceId>,
        job_ids: Vec<JobId>,
        recurrence: ScheduleRecurrence,
        next_run_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let device_ids = dedup_in_order(device_ids);
        let job_ids = dedup_in_order(job_ids);

        if device_ids.is_empty() {
            return Err(AppError::Validation(
                "scheduled job requires at least one device".to_owned(),
            ));
        }

        if job_ids.is_empty() {
            return Err(AppError::Validation(
                "scheduled job requires at least one job".to_owned(),
            ));
        }

        Ok(Self {
            id,
            compliance_name: NonEmptyString::for_field("compliance name", compliance_name)?,
            device_ids,
            job_ids,
            recurrence,
            next_run_at,
            last_run_at: None,
            created_at,
        })
    }

    /// Returns whether the schedule should run at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_run_at <= now
    }

    /// Returns the schedule after a run claimed at `now`, or `None` when it is exhausted.
    ///
    /// Missed periods are skipped: the next run is the first slot strictly after `now`.
    #[must_use]
    pub fn advance(&self, now: DateTime<Utc>) -> Option<Self> {
        let interval = self.recurrence.interval()?;
        let interval_seconds = interval.num_seconds().max(1);

        let next_run_at = if self.next_run_at > now {
            self.next_run_at + interval
        } else {
            let elapsed_seconds = (now - self.next_run_at).num_seconds();
            let periods = elapsed_seconds / interval_seconds + 1;
            self.next_run_at + TimeDelta::seconds(interval_seconds.saturating_mul(periods))
        };

        Some(Self {
            next_run_at,
            last_run_at: Some(now),
            ..self.clone()
        })
    }

    /// Returns the schedule identifier.
    #[must_use]
    pub fn id(&self) -> ScheduledJobId {
        self.id
    }

    /// Returns the label given to produced log entries.
    #[must_use]
    pub fn compliance_name(&self) -> &NonEmptyString {
        &self.compliance_name
    }

    /// Returns target devices.
    #[must_use]
    pub fn device_ids(&self) -> &[DeviceId] {
        &self.device_ids
    }

    /// Returns jobs to execute.
    #[must_use]
    pub fn job_ids(&self) -> &[JobId] {
        &self.job_ids
    }

    /// Returns the recurrence.
    #[must_use]
    pub fn recurrence(&self) -> ScheduleRecurrence {
        self.recurrence
    }

    /// Returns the next due instant.
    #[must_use]
    pub fn next_run_at(&self) -> DateTime<Utc> {
        self.next_run_at
    }

    /// Returns when the schedule was last claimed.
    #[must_use]
    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run_at
    }

    /// Returns when the schedule was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn dedup_in_order<T>(values: Vec<T>) -> Vec<T>
where
    T: Copy + Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(*value))
        .collect()
}
