//! Switchboard scheduled compliance run worker.

#![forbid(unsafe_code)]

use std::env;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header;
use serde::{Deserialize, Serialize};
use switchboard_application::RandomSource;
use switchboard_core::{AppError, AppResult};
use switchboard_domain::{ComplianceStatus, Device, JobDefinition, simulate_compliance_run};
use switchboard_infrastructure::SystemRandomSource;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

const WORKER_ID_HEADER: &str = "x-switchboard-worker-id";

#[derive(Debug, Clone)]
struct WorkerConfig {
    api_base_url: String,
    worker_shared_secret: String,
    worker_id: String,
    claim_limit: usize,
    poll_interval_ms: u64,
}

#[derive(Debug, Serialize)]
struct ClaimScheduledJobsRequest {
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct ClaimedScheduledJobsResponse {
    jobs: Vec<ClaimedScheduledJobResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimedScheduledJobResponse {
    scheduled_job_id: String,
    compliance_name: String,
    scheduled_for: DateTime<Utc>,
    devices: Vec<Device>,
    jobs: Vec<JobDefinition>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletedRunRequest {
    compliance_name: String,
    status: ComplianceStatus,
    details: String,
    devices_count: u32,
    jobs_count: u32,
    timestamp: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let random_source = SystemRandomSource::new();
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        worker_id = %config.worker_id,
        api_base_url = %config.api_base_url,
        claim_limit = config.claim_limit,
        poll_interval_ms = config.poll_interval_ms,
        "switchboard-worker started"
    );

    loop {
        match claim_scheduled_jobs(&http_client, &config).await {
            Ok(claimed_jobs) if claimed_jobs.is_empty() => {
                tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
            }
            Ok(claimed_jobs) => {
                info!(
                    worker_id = %config.worker_id,
                    claimed_count = claimed_jobs.len(),
                    "claimed scheduled compliance runs"
                );

                for claimed_job in claimed_jobs {
                    let scheduled_job_id = claimed_job.scheduled_job_id.clone();
                    let scheduled_for = claimed_job.scheduled_for;
                    let completed = match execute_claimed_job(claimed_job, &random_source) {
                        Ok(completed) => completed,
                        Err(error) => {
                            warn!(
                                worker_id = %config.worker_id,
                                scheduled_job_id = %scheduled_job_id,
                                error = %error,
                                "scheduled compliance run could not be simulated"
                            );
                            continue;
                        }
                    };
                    let status = completed.status;

                    match report_completed_run(&http_client, &config, &completed).await {
                        Ok(()) => info!(
                            worker_id = %config.worker_id,
                            scheduled_job_id = %scheduled_job_id,
                            scheduled_for = %scheduled_for,
                            status = status.as_str(),
                            "scheduled compliance run recorded"
                        ),
                        Err(error) => warn!(
                            worker_id = %config.worker_id,
                            scheduled_job_id = %scheduled_job_id,
                            error = %error,
                            "failed to record scheduled compliance run"
                        ),
                    }
                }
            }
            Err(error) => {
                warn!(
                    worker_id = %config.worker_id,
                    error = %error,
                    "failed to claim scheduled compliance runs"
                );
                tokio::time::sleep(Duration::from_millis(config.poll_interval_ms)).await;
            }
        }
    }
}

fn execute_claimed_job(
    claimed_job: ClaimedScheduledJobResponse,
    random_source: &dyn RandomSource,
) -> AppResult<CompletedRunRequest> {
    let outcome = simulate_compliance_run(&claimed_job.devices, &claimed_job.jobs, || {
        random_source.next_unit()
    })?;

    Ok(CompletedRunRequest {
        compliance_name: claimed_job.compliance_name,
        status: outcome.status(),
        details: outcome.details().to_owned(),
        devices_count: outcome.devices_count(),
        jobs_count: outcome.jobs_count(),
        timestamp: Utc::now(),
    })
}

async fn claim_scheduled_jobs(
    http_client: &reqwest::Client,
    config: &WorkerConfig,
) -> AppResult<Vec<ClaimedScheduledJobResponse>> {
    let endpoint = format!(
        "{}/api/internal/worker/scheduled-jobs/claim",
        config.api_base_url
    );
    let response = http_client
        .post(endpoint)
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", config.worker_shared_secret),
        )
        .header(WORKER_ID_HEADER, config.worker_id.as_str())
        .json(&ClaimScheduledJobsRequest {
            limit: config.claim_limit,
        })
        .send()
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to call worker claim endpoint: {error}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        return Err(AppError::Internal(format!(
            "worker claim endpoint returned status {}: {body}",
            status.as_u16()
        )));
    }

    let response_body = response
        .json::<ClaimedScheduledJobsResponse>()
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to parse worker claim endpoint response body: {error}"
            ))
        })?;

    Ok(response_body.jobs)
}

async fn report_completed_run(
    http_client: &reqwest::Client,
    config: &WorkerConfig,
    completed: &CompletedRunRequest,
) -> AppResult<()> {
    let endpoint = format!("{}/api/internal/worker/compliance-logs", config.api_base_url);
    let response = http_client
        .post(endpoint)
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", config.worker_shared_secret),
        )
        .header(WORKER_ID_HEADER, config.worker_id.as_str())
        .json(completed)
        .send()
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to call compliance log endpoint: {error}"))
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        return Err(AppError::Internal(format!(
            "compliance log endpoint returned status {}: {body}",
            status.as_u16()
        )));
    }

    Ok(())
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3001".to_owned())
            .trim_end_matches('/')
            .to_owned();
        Url::parse(api_base_url.as_str())
            .map_err(|error| AppError::Validation(format!("invalid API_BASE_URL: {error}")))?;

        let worker_shared_secret = required_env("WORKER_SHARED_SECRET")?;
        let worker_id = env::var("WORKER_ID")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("worker-{}", uuid::Uuid::new_v4()));
        let claim_limit = parse_env_usize("WORKER_CLAIM_LIMIT", 5)?;
        let poll_interval_ms = parse_env_u64("WORKER_POLL_INTERVAL_MS", 5000)?;

        if claim_limit == 0 {
            return Err(AppError::Validation(
                "WORKER_CLAIM_LIMIT must be greater than zero".to_owned(),
            ));
        }

        if poll_interval_ms == 0 {
            return Err(AppError::Validation(
                "WORKER_POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            worker_shared_secret,
            worker_id,
            claim_limit,
            poll_interval_ms,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_usize(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
