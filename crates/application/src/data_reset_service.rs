use std::sync::Arc;

use switchboard_domain::{Device, JobDefinition, ScheduledJob};
use tracing::warn;

use crate::compliance_log_store::ComplianceLogStore;
use crate::master_password_service::MasterPasswordService;
use crate::persisted_collection::PersistedCollection;

/// Wipes every record the dashboard owns.
#[derive(Clone)]
pub struct DataResetService {
    devices: Arc<PersistedCollection<Device>>,
    jobs: Arc<PersistedCollection<JobDefinition>>,
    schedules: Arc<PersistedCollection<ScheduledJob>>,
    log_store: ComplianceLogStore,
    master_password_service: MasterPasswordService,
}

impl DataResetService {
    /// Creates a reset service over the live collections.
    #[must_use]
    pub fn new(
        devices: Arc<PersistedCollection<Device>>,
        jobs: Arc<PersistedCollection<JobDefinition>>,
        schedules: Arc<PersistedCollection<ScheduledJob>>,
        log_store: ComplianceLogStore,
        master_password_service: MasterPasswordService,
    ) -> Self {
        Self {
            devices,
            jobs,
            schedules,
            log_store,
            master_password_service,
        }
    }

    /// Clears devices, jobs, schedules, the compliance log and the master password.
    pub async fn clear_all(&self) {
        self.schedules.clear().await;
        self.devices.clear().await;
        self.jobs.clear().await;
        self.log_store.clear().await;
        self.master_password_service.clear().await;

        warn!("all dashboard data cleared");
    }
}
