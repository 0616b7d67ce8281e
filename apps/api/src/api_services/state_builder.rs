use std::sync::Arc;
use std::time::Duration;

use switchboard_application::{
    ComplianceLogStore, ComplianceRunService, ComponentNameService, ComponentNameSuggester,
    DataResetService, DeviceService, JobService, KeyValueStore, MasterPasswordService,
    PasswordHasher, PersistedCollection, RandomSource, ScheduleService, storage_keys,
};
use switchboard_core::{AppError, AppResult};
use switchboard_infrastructure::{Argon2PasswordHasher, SystemRandomSource};

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::{build_component_name_suggester, build_key_value_store};

const SUGGESTER_TIMEOUT: Duration = Duration::from_secs(20);

pub async fn build_app_state(config: &ApiConfig) -> AppResult<AppState> {
    let store = build_key_value_store(&config.storage_backend).await?;
    let http_client = reqwest::Client::builder()
        .timeout(SUGGESTER_TIMEOUT)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    Ok(assemble_app_state(
        store,
        build_component_name_suggester(&config.component_suggester, http_client),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(SystemRandomSource::new()),
        config.frontend_url.clone(),
        config.worker_shared_secret.clone(),
    )
    .await)
}

pub(crate) async fn assemble_app_state(
    store: Arc<dyn KeyValueStore>,
    suggester: Arc<dyn ComponentNameSuggester>,
    password_hasher: Arc<dyn PasswordHasher>,
    random_source: Arc<dyn RandomSource>,
    frontend_url: String,
    worker_shared_secret: String,
) -> AppState {
    let devices = Arc::new(PersistedCollection::load(store.clone(), storage_keys::DEVICES).await);
    let jobs = Arc::new(PersistedCollection::load(store.clone(), storage_keys::JOBS).await);
    let schedules =
        Arc::new(PersistedCollection::load(store.clone(), storage_keys::SCHEDULED_JOBS).await);
    let compliance_log_store = ComplianceLogStore::load(store.clone()).await;
    let master_password_service = MasterPasswordService::load(store, password_hasher).await;

    let device_service = DeviceService::new(devices.clone(), random_source.clone());
    let job_service = JobService::new(jobs.clone());

    AppState {
        compliance_run_service: ComplianceRunService::new(
            device_service.clone(),
            job_service.clone(),
            compliance_log_store.clone(),
            random_source,
        ),
        schedule_service: ScheduleService::new(
            schedules.clone(),
            device_service.clone(),
            job_service.clone(),
        ),
        data_reset_service: DataResetService::new(
            devices,
            jobs,
            schedules,
            compliance_log_store.clone(),
            master_password_service.clone(),
        ),
        component_name_service: ComponentNameService::new(suggester),
        device_service,
        job_service,
        compliance_log_store,
        master_password_service,
        frontend_url,
        worker_shared_secret,
    }
}
