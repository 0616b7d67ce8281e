//! Random-draw simulation of device probes and compliance checks.
//!
//! Callers supply the draws as a closure yielding values in `[0, 1)`, which
//! keeps this module free of any random-number source. A failed draw aborts
//! the simulation instead of producing a result.

use chrono::{DateTime, Utc};
use switchboard_core::{AppError, AppResult};

use crate::{
    ComplianceLogEntryInput, ComplianceStatus, Device, JobDefinition, REACHABILITY_PROBABILITY,
    Reachability,
};

/// Probability that a reachable device passes a simulated compliance check.
pub const DEVICE_PASS_PROBABILITY: f64 = 0.7;

/// Result of one simulated compliance run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceRunOutcome {
    status: ComplianceStatus,
    details: String,
    devices_count: u32,
    jobs_count: u32,
    passed_devices: u32,
}

impl ComplianceRunOutcome {
    /// Returns the aggregate status.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    /// Returns the per-device report.
    #[must_use]
    pub fn details(&self) -> &str {
        self.details.as_str()
    }

    /// Returns how many devices were checked.
    #[must_use]
    pub fn devices_count(&self) -> u32 {
        self.devices_count
    }

    /// Returns how many jobs ran on each device.
    #[must_use]
    pub fn jobs_count(&self) -> u32 {
        self.jobs_count
    }

    /// Returns how many devices passed.
    #[must_use]
    pub fn passed_devices(&self) -> u32 {
        self.passed_devices
    }

    /// Builds the log entry payload for this outcome.
    pub fn to_log_input(
        &self,
        compliance_name: &str,
        completed_at: DateTime<Utc>,
    ) -> AppResult<ComplianceLogEntryInput> {
        Ok(ComplianceLogEntryInput::new(
            compliance_name,
            self.status,
            self.details.clone(),
            self.devices_count,
            self.jobs_count,
        )?
        .with_timestamp(completed_at))
    }
}

/// Simulates a reachability probe.
pub fn simulate_reachability(draw: impl FnOnce() -> AppResult<f64>) -> AppResult<bool> {
    Ok(draw()? < REACHABILITY_PROBABILITY)
}

/// Simulates running every job against every device.
///
/// Devices last seen unreachable fail without consuming a draw.
pub fn simulate_compliance_run(
    devices: &[Device],
    jobs: &[JobDefinition],
    mut draw: impl FnMut() -> AppResult<f64>,
) -> AppResult<ComplianceRunOutcome> {
    if devices.is_empty() {
        return Err(AppError::Validation(
            "compliance run requires at least one device".to_owned(),
        ));
    }

    if jobs.is_empty() {
        return Err(AppError::Validation(
            "compliance run requires at least one job".to_owned(),
        ));
    }

    let job_names = jobs
        .iter()
        .map(|job| job.name().as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut passed_devices = 0_u32;
    let mut lines = Vec::with_capacity(devices.len());
    for device in devices {
        let line = if device.reachability() == Reachability::Unreachable {
            format!(
                "{} ({}): FAIL - device unreachable",
                device.name(),
                device.ip_address()
            )
        } else if draw()? < DEVICE_PASS_PROBABILITY {
            passed_devices = passed_devices.saturating_add(1);
            format!(
                "{} ({}): PASS - {}",
                device.name(),
                device.ip_address(),
                job_names
            )
        } else {
            format!(
                "{} ({}): FAIL - {}",
                device.name(),
                device.ip_address(),
                job_names
            )
        };
        lines.push(line);
    }

    let devices_count = u32::try_from(devices.len()).unwrap_or(u32::MAX);
    let status = if passed_devices == devices_count {
        ComplianceStatus::Success
    } else if passed_devices == 0 {
        ComplianceStatus::Failed
    } else {
        ComplianceStatus::PartialSuccess
    };

    Ok(ComplianceRunOutcome {
        status,
        details: lines.join("\n"),
        devices_count,
        jobs_count: u32::try_from(jobs.len()).unwrap_or(u32::MAX),
        passed_devices,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use switchboard_core::AppError;

    use super::{simulate_compliance_run, simulate_reachability};
    use crate::{ComplianceStatus, Device, DeviceId, JobDefinition, JobId};

    fn device(name: &str) -> Device {
        Device::new(
            DeviceId::new(),
            name,
            "192.0.2.10",
            "router",
            None,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn job(name: &str) -> JobDefinition {
        JobDefinition::new(JobId::new(), name, "show run", "hostname", None, Utc::now())
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn all_passing_draws_yield_success() {
        let outcome = simulate_compliance_run(&[device("a"), device("b")], &[job("ntp")], || Ok(0.1))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(outcome.status(), ComplianceStatus::Success);
        assert_eq!(outcome.passed_devices(), 2);
        assert_eq!(outcome.devices_count(), 2);
        assert_eq!(outcome.jobs_count(), 1);
        assert!(outcome.details().contains("a (192.0.2.10): PASS - ntp"));
    }

    #[test]
    fn mixed_draws_yield_partial_success() {
        let mut draws = [0.1, 0.9].into_iter();
        let outcome = simulate_compliance_run(&[device("a"), device("b")], &[job("ntp")], || {
            Ok(draws.next().unwrap_or(0.0))
        })
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(outcome.status(), ComplianceStatus::PartialSuccess);
        assert!(outcome.details().contains("b (192.0.2.10): FAIL - ntp"));
    }

    #[test]
    fn unreachable_device_fails_without_drawing() {
        let unreachable = device("a").with_probe_result(false, Utc::now());
        let outcome = simulate_compliance_run(&[unreachable], &[job("ntp")], || {
            unreachable!("no draw expected")
        })
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(outcome.status(), ComplianceStatus::Failed);
        assert!(outcome.details().contains("device unreachable"));
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert!(simulate_compliance_run(&[], &[job("ntp")], || Ok(0.0)).is_err());
        assert!(simulate_compliance_run(&[device("a")], &[], || Ok(0.0)).is_err());
    }

    #[test]
    fn reachability_uses_threshold() {
        assert!(matches!(simulate_reachability(|| Ok(0.79)), Ok(true)));
        assert!(matches!(simulate_reachability(|| Ok(0.8)), Ok(false)));
    }

    #[test]
    fn failed_draw_aborts_simulation() {
        let entropy_error = || Err(AppError::Internal("entropy unavailable".to_owned()));

        assert!(matches!(
            simulate_reachability(entropy_error),
            Err(AppError::Internal(_))
        ));
        assert!(matches!(
            simulate_compliance_run(&[device("a"), device("b")], &[job("ntp")], entropy_error),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn outcome_converts_to_log_input() {
        let completed_at = Utc::now();
        let outcome = simulate_compliance_run(&[device("a")], &[job("ntp")], || Ok(0.0))
            .unwrap_or_else(|_| unreachable!());
        let input = outcome
            .to_log_input("Ad-hoc Run", completed_at)
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(input.compliance_name().as_str(), "Ad-hoc Run");
        assert_eq!(input.timestamp(), Some(completed_at));
        assert_eq!(input.status(), ComplianceStatus::Success);
    }
}
