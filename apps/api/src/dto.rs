mod common;
mod compliance;
mod devices;
mod jobs;
mod schedules;
mod settings;
mod worker;

pub use common::{GenericMessageResponse, HealthResponse};
pub use compliance::{
    AppendComplianceLogRequest, ComplianceLogEntryResponse, ComplianceRunResponse,
    RunComplianceRequest,
};
pub use devices::{DeviceResponse, SaveDeviceRequest};
pub use jobs::{JobResponse, SaveJobRequest};
pub use schedules::{CreateScheduledJobRequest, ScheduledJobResponse};
pub use settings::{
    MasterPasswordStatusResponse, SetMasterPasswordRequest, SuggestComponentNameRequest,
    SuggestComponentNameResponse, VerifyMasterPasswordRequest, VerifyMasterPasswordResponse,
};
pub use worker::{
    ClaimScheduledJobsRequest, ClaimedScheduledJobResponse, ClaimedScheduledJobsResponse,
};
