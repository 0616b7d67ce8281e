//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod compliance;
mod device;
mod job;
mod schedule;
mod simulation;

pub use compliance::{
    COMPLIANCE_LOG_CAPACITY, ComplianceLog, ComplianceLogEntry, ComplianceLogEntryInput,
    ComplianceStatus, ScanId,
};
pub use device::{Device, DeviceId, REACHABILITY_PROBABILITY, Reachability};
pub use job::{JobDefinition, JobId};
pub use schedule::{ScheduleRecurrence, ScheduledJob, ScheduledJobId};
pub use simulation::{
    ComplianceRunOutcome, DEVICE_PASS_PROBABILITY, simulate_compliance_run, simulate_reachability,
};
