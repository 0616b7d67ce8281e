use switchboard_application::{
    ComplianceLogStore, ComplianceRunService, ComponentNameService, DataResetService,
    DeviceService, JobService, MasterPasswordService, ScheduleService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub device_service: DeviceService,
    pub job_service: JobService,
    pub compliance_log_store: ComplianceLogStore,
    pub compliance_run_service: ComplianceRunService,
    pub schedule_service: ScheduleService,
    pub master_password_service: MasterPasswordService,
    pub component_name_service: ComponentNameService,
    pub data_reset_service: DataResetService,
    pub frontend_url: String,
    pub worker_shared_secret: String,
}
