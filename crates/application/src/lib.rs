//! Application services and ports.

#![forbid(unsafe_code)]

mod compliance_log_store;
mod compliance_run_service;
mod component_name_service;
mod data_reset_service;
mod device_service;
mod job_service;
mod master_password_service;
mod persisted_collection;
mod schedule_service;
mod simulation_ports;
mod storage_ports;

#[cfg(test)]
mod test_support;

pub use compliance_log_store::ComplianceLogStore;
pub use compliance_run_service::{ComplianceRunReport, ComplianceRunService, RunComplianceInput};
pub use component_name_service::{
    ComponentNameService, ComponentNameSuggester, MAX_COMPONENT_DESCRIPTION_LENGTH,
    MAX_COMPONENT_NAME_LENGTH, normalize_component_name,
};
pub use data_reset_service::DataResetService;
pub use device_service::{DeviceService, SaveDeviceInput};
pub use job_service::{JobService, SaveJobInput};
pub use master_password_service::{
    MAX_MASTER_PASSWORD_LENGTH, MIN_MASTER_PASSWORD_LENGTH, MasterPasswordService, PasswordHasher,
};
pub use persisted_collection::PersistedCollection;
pub use schedule_service::{
    ClaimedScheduledJob, MAX_SCHEDULE_CLAIM_LIMIT, ScheduleJobInput, ScheduleService,
};
pub use simulation_ports::RandomSource;
pub use storage_ports::{KeyValueStore, storage_keys};
