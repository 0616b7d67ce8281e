use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use switchboard_application::RandomSource;
use switchboard_core::AppResult;
use switchboard_infrastructure::{
    Argon2PasswordHasher, HeuristicComponentNameSuggester, InMemoryKeyValueStore,
};

use super::{compliance, components, data, devices, jobs, master_password, schedules, worker};
use crate::api_services::assemble_app_state;
use crate::dto::{
    AppendComplianceLogRequest, ClaimScheduledJobsRequest, CreateScheduledJobRequest,
    RunComplianceRequest, SaveDeviceRequest, SaveJobRequest, SetMasterPasswordRequest,
    SuggestComponentNameRequest,
};
use crate::middleware::WorkerIdentity;
use crate::state::AppState;

struct ConstantRandom(f64);

impl RandomSource for ConstantRandom {
    fn next_unit(&self) -> AppResult<f64> {
        Ok(self.0)
    }
}

async fn test_state() -> AppState {
    assemble_app_state(
        Arc::new(InMemoryKeyValueStore::new()),
        Arc::new(HeuristicComponentNameSuggester::new()),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(ConstantRandom(0.0)),
        "http://localhost:3000".to_owned(),
        "0123456789abcdef-secret".to_owned(),
    )
    .await
}

fn append_request(name: &str, timestamp: &str) -> AppendComplianceLogRequest {
    AppendComplianceLogRequest {
        compliance_name: name.to_owned(),
        status: "Success".to_owned(),
        details: String::new(),
        devices_count: 1,
        jobs_count: 1,
        timestamp: Some(timestamp.to_owned()),
    }
}

async fn seed_targets(state: &AppState) -> (String, String) {
    let (_, Json(device)) = devices::create_device_handler(
        State(state.clone()),
        Json(SaveDeviceRequest {
            name: "edge-1".to_owned(),
            ip_address: "10.0.0.1".to_owned(),
            device_type: "router".to_owned(),
            location: Some("Lab".to_owned()),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let (_, Json(job)) = jobs::create_job_handler(
        State(state.clone()),
        Json(SaveJobRequest {
            name: "ntp".to_owned(),
            command: "show ntp status".to_owned(),
            template: "synchronized".to_owned(),
            description: None,
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    (device.id, job.id)
}

#[tokio::test]
async fn eleven_appends_keep_ten_relabeled_entries() {
    let state = test_state().await;
    for run in 1..=11 {
        let timestamp = format!("2026-01-01T10:{run:02}:00Z");
        let result = compliance::append_compliance_log_handler(
            State(state.clone()),
            Json(append_request(format!("run-{run}").as_str(), timestamp.as_str())),
        )
        .await;
        assert!(matches!(result, Ok((StatusCode::CREATED, _))));
    }

    let Json(entries) = compliance::list_compliance_logs_handler(State(state)).await;
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].compliance_name, "run-11");
    assert_eq!(entries[0].scan_id, "Scan 10");
    assert_eq!(entries[9].compliance_name, "run-2");
    assert_eq!(entries[9].scan_id, "Scan 01");
}

#[tokio::test]
async fn invalid_append_maps_to_bad_request() {
    let state = test_state().await;
    let request = append_request("  ", "2026-01-01T10:00:00Z");

    let result = compliance::append_compliance_log_handler(State(state), Json(request)).await;
    assert!(matches!(
        result.map_err(|error| error.status_code()),
        Err(StatusCode::BAD_REQUEST)
    ));
}

#[tokio::test]
async fn run_compliance_appends_to_log() {
    let state = test_state().await;
    let (device_id, job_id) = seed_targets(&state).await;

    let Json(report) = compliance::run_compliance_handler(
        State(state.clone()),
        Json(RunComplianceRequest {
            compliance_name: "Ad-hoc".to_owned(),
            device_ids: vec![device_id],
            job_ids: vec![job_id],
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(report.status, "Success");
    assert_eq!(report.passed_devices, 1);

    let Json(entries) = compliance::list_compliance_logs_handler(State(state)).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].scan_id, "Scan 01");
    assert_eq!(entries[0].compliance_name, "Ad-hoc");
}

#[tokio::test]
async fn device_errors_map_to_status_codes() {
    let state = test_state().await;

    let malformed =
        devices::get_device_handler(State(state.clone()), Path("not-a-uuid".to_owned())).await;
    assert!(matches!(
        malformed.map_err(|error| error.status_code()),
        Err(StatusCode::BAD_REQUEST)
    ));

    let missing = devices::delete_device_handler(
        State(state.clone()),
        Path("7b0f3c1e-5d5e-4c39-9d0e-0a8f3bb1a001".to_owned()),
    )
    .await;
    assert!(matches!(
        missing.map_err(|error| error.status_code()),
        Err(StatusCode::NOT_FOUND)
    ));

    seed_targets(&state).await;
    let duplicate = devices::create_device_handler(
        State(state),
        Json(SaveDeviceRequest {
            name: "EDGE-1".to_owned(),
            ip_address: "10.0.0.2".to_owned(),
            device_type: "router".to_owned(),
            location: None,
        }),
    )
    .await;
    assert!(matches!(
        duplicate.map_err(|error| error.status_code()),
        Err(StatusCode::CONFLICT)
    ));
}

#[tokio::test]
async fn worker_claims_due_schedule_and_reports_run() {
    let state = test_state().await;
    let (device_id, job_id) = seed_targets(&state).await;

    let created = schedules::create_scheduled_job_handler(
        State(state.clone()),
        Json(CreateScheduledJobRequest {
            compliance_name: "Nightly".to_owned(),
            device_ids: vec![device_id],
            job_ids: vec![job_id],
            recurrence: "once".to_owned(),
            next_run_at: Some("2020-01-01T00:00:00Z".to_owned()),
        }),
    )
    .await;
    assert!(matches!(created, Ok((StatusCode::CREATED, _))));

    let Json(claimed) = worker::claim_scheduled_jobs_handler(
        State(state.clone()),
        Extension(WorkerIdentity::new("worker-a")),
        Json(ClaimScheduledJobsRequest::default()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(claimed.jobs.len(), 1);
    assert_eq!(claimed.jobs[0].compliance_name, "Nightly");
    assert_eq!(claimed.jobs[0].devices.len(), 1);

    let Json(remaining) = schedules::list_scheduled_jobs_handler(State(state.clone())).await;
    assert!(remaining.is_empty());

    let recorded = worker::record_worker_compliance_log_handler(
        State(state.clone()),
        Extension(WorkerIdentity::new("worker-a")),
        Json(append_request("Nightly", "2026-01-01T00:00:00Z")),
    )
    .await;
    assert!(matches!(recorded, Ok(StatusCode::ACCEPTED)));

    let Json(entries) = compliance::list_compliance_logs_handler(State(state)).await;
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn clearing_data_requires_master_password_once_set() {
    let state = test_state().await;
    seed_targets(&state).await;

    let set = master_password::set_master_password_handler(
        State(state.clone()),
        Json(SetMasterPasswordRequest {
            current_password: None,
            new_password: "switchboard-admin".to_owned(),
        }),
    )
    .await;
    assert!(set.is_ok());

    let refused = data::clear_data_handler(State(state.clone()), HeaderMap::new()).await;
    assert!(matches!(
        refused.map_err(|error| error.status_code()),
        Err(StatusCode::UNAUTHORIZED)
    ));

    let mut headers = HeaderMap::new();
    headers.insert(
        data::MASTER_PASSWORD_HEADER,
        HeaderValue::from_static("switchboard-admin"),
    );
    assert!(
        data::clear_data_handler(State(state.clone()), headers)
            .await
            .is_ok()
    );

    let Json(devices) = devices::list_devices_handler(State(state.clone())).await;
    assert!(devices.is_empty());
    let Json(status) = master_password::master_password_status_handler(State(state)).await;
    assert!(!status.configured);
}

#[tokio::test]
async fn suggest_name_uses_configured_suggester() {
    let state = test_state().await;
    let Json(response) = components::suggest_component_name_handler(
        State(state),
        Json(SuggestComponentNameRequest {
            description: "table of recent compliance scans".to_owned(),
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(response.name, "RecentComplianceScansList");
}
