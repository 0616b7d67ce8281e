use std::sync::Arc;

use chrono::Utc;
use switchboard_core::{AppError, AppResult};
use switchboard_domain::{JobDefinition, JobId};
use tracing::info;

use crate::persisted_collection::PersistedCollection;

/// Input payload for job create/update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveJobInput {
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Command sent to the device.
    pub command: String,
    /// Template the command output is checked against.
    pub template: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Application service for job definitions.
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<PersistedCollection<JobDefinition>>,
}

impl JobService {
    /// Creates a service over a persisted job collection.
    #[must_use]
    pub fn new(jobs: Arc<PersistedCollection<JobDefinition>>) -> Self {
        Self { jobs }
    }

    /// Lists jobs in creation order.
    pub async fn list_jobs(&self) -> Vec<JobDefinition> {
        self.jobs.snapshot().await
    }

    /// Returns one job.
    pub async fn get_job(&self, job_id: JobId) -> AppResult<JobDefinition> {
        self.jobs
            .snapshot()
            .await
            .into_iter()
            .find(|job| job.id() == job_id)
            .ok_or_else(|| job_not_found(job_id))
    }

    /// Resolves every requested id, in request order.
    pub async fn find_jobs(&self, job_ids: &[JobId]) -> AppResult<Vec<JobDefinition>> {
        let jobs = self.jobs.snapshot().await;
        job_ids
            .iter()
            .map(|job_id| {
                jobs.iter()
                    .find(|job| job.id() == *job_id)
                    .cloned()
                    .ok_or_else(|| job_not_found(*job_id))
            })
            .collect()
    }

    /// Creates a job definition.
    pub async fn create_job(&self, input: SaveJobInput) -> AppResult<JobDefinition> {
        let job = JobDefinition::new(
            JobId::new(),
            input.name,
            input.command,
            input.template,
            input.description,
            Utc::now(),
        )?;

        let created = job.clone();
        self.jobs
            .mutate(move |jobs| {
                ensure_unique_name(jobs, &job, None)?;
                jobs.push(job);
                Ok(())
            })
            .await?;

        info!(job_id = %created.id(), name = %created.name(), "job created");
        Ok(created)
    }

    /// Replaces the editable attributes of a job.
    pub async fn update_job(&self, job_id: JobId, input: SaveJobInput) -> AppResult<JobDefinition> {
        self.jobs
            .mutate(move |jobs| {
                let position = jobs
                    .iter()
                    .position(|job| job.id() == job_id)
                    .ok_or_else(|| job_not_found(job_id))?;

                let revised = jobs[position].revise(
                    input.name,
                    input.command,
                    input.template,
                    input.description,
                )?;
                ensure_unique_name(jobs, &revised, Some(job_id))?;
                jobs[position] = revised.clone();
                Ok(revised)
            })
            .await
    }

    /// Removes a job.
    pub async fn delete_job(&self, job_id: JobId) -> AppResult<()> {
        self.jobs
            .mutate(move |jobs| {
                let before = jobs.len();
                jobs.retain(|job| job.id() != job_id);
                if jobs.len() == before {
                    return Err(job_not_found(job_id));
                }
                Ok(())
            })
            .await?;

        info!(job_id = %job_id, "job removed");
        Ok(())
    }
}

fn ensure_unique_name(
    jobs: &[JobDefinition],
    candidate: &JobDefinition,
    excluded: Option<JobId>,
) -> AppResult<()> {
    let clash = jobs.iter().any(|job| {
        Some(job.id()) != excluded
            && job
                .name()
                .as_str()
                .eq_ignore_ascii_case(candidate.name().as_str())
    });

    if clash {
        return Err(AppError::Conflict(format!(
            "job '{}' already exists",
            candidate.name()
        )));
    }

    Ok(())
}

fn job_not_found(job_id: JobId) -> AppError {
    AppError::NotFound(format!("job '{job_id}' does not exist"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use switchboard_core::AppError;
    use switchboard_domain::JobId;

    use super::{JobService, SaveJobInput};
    use crate::persisted_collection::PersistedCollection;
    use crate::storage_ports::{KeyValueStore, storage_keys};
    use crate::test_support::MemoryStore;

    fn input(name: &str) -> SaveJobInput {
        SaveJobInput {
            name: name.to_owned(),
            command: "show running-config | include ntp".to_owned(),
            template: "ntp server 192.0.2.1".to_owned(),
            description: Some("NTP baseline".to_owned()),
        }
    }

    async fn service() -> JobService {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        JobService::new(Arc::new(
            PersistedCollection::load(store, storage_keys::JOBS).await,
        ))
    }

    #[tokio::test]
    async fn create_and_get_job() {
        let service = service().await;
        let job = service
            .create_job(input("ntp"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let fetched = service
            .get_job(job.id())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(fetched, job);
        assert_eq!(fetched.description(), Some("NTP baseline"));
    }

    #[tokio::test]
    async fn rename_onto_existing_job_conflicts() {
        let service = service().await;
        assert!(service.create_job(input("ntp")).await.is_ok());
        let snmp = service
            .create_job(input("snmp"))
            .await
            .unwrap_or_else(|_| unreachable!());

        let result = service.update_job(snmp.id(), input("NTP")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn blank_command_is_rejected() {
        let service = service().await;
        let result = service
            .create_job(SaveJobInput {
                command: "  ".to_owned(),
                ..input("ntp")
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list_jobs().await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_job() {
        let service = service().await;
        let job = service
            .create_job(input("ntp"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(service.delete_job(job.id()).await.is_ok());
        assert!(matches!(
            service.delete_job(JobId::new()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.list_jobs().await.is_empty());
    }
}
