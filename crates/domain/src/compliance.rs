use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

/// Maximum number of entries retained by a compliance log.
pub const COMPLIANCE_LOG_CAPACITY: usize = 10;

/// Outcome of one compliance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// Every device passed.
    Success,
    /// No device passed.
    Failed,
    /// Some devices passed.
    #[serde(rename = "Partial Success")]
    PartialSuccess,
}

impl ComplianceStatus {
    /// Returns the stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::PartialSuccess => "Partial Success",
        }
    }

    /// Parses a transport value into a status.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for ComplianceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Success" => Ok(Self::Success),
            "Failed" => Ok(Self::Failed),
            "Partial Success" => Ok(Self::PartialSuccess),
            _ => Err(AppError::Validation(format!(
                "unknown compliance status '{value}'"
            ))),
        }
    }
}

/// Display label of a log entry, rendered as `Scan NN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScanId(usize);

impl ScanId {
    /// Label used before an entry has been placed in a log.
    pub const FIRST: Self = Self(1);

    /// Creates a scan label from a one-based sequence number.
    pub fn new(sequence: usize) -> AppResult<Self> {
        if sequence == 0 {
            return Err(AppError::Validation(
                "scan sequence numbers start at 1".to_owned(),
            ));
        }

        Ok(Self(sequence))
    }

    /// Returns the one-based sequence number.
    #[must_use]
    pub fn sequence(&self) -> usize {
        self.0
    }
}

impl Display for ScanId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "Scan {:02}", self.0)
    }
}

impl TryFrom<String> for ScanId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let sequence = value
            .strip_prefix("Scan ")
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| AppError::Validation(format!("invalid scan id '{value}'")))?;

        Self::new(sequence)
    }
}

impl From<ScanId> for String {
    fn from(value: ScanId) -> Self {
        value.to_string()
    }
}

/// Validated payload for a completed compliance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceLogEntryInput {
    compliance_name: NonEmptyString,
    status: ComplianceStatus,
    details: String,
    devices_count: u32,
    jobs_count: u32,
    timestamp: Option<DateTime<Utc>>,
}

impl ComplianceLogEntryInput {
    /// Creates a validated log entry payload.
    pub fn new(
        compliance_name: impl Into<String>,
        status: ComplianceStatus,
        details: impl Into<String>,
        devices_count: u32,
        jobs_count: u32,
    ) -> AppResult<Self> {
        Ok(Self {
            compliance_name: NonEmptyString::for_field("compliance name", compliance_name)?,
            status,
            details: details.into(),
            devices_count,
            jobs_count,
            timestamp: None,
        })
    }

    /// Sets the completion instant instead of defaulting to insertion time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Returns the run label.
    #[must_use]
    pub fn compliance_name(&self) -> &NonEmptyString {
        &self.compliance_name
    }

    /// Returns the run outcome.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    /// Returns the caller-supplied completion instant.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// One retained compliance run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceLogEntry {
    id: Uuid,
    compliance_name: NonEmptyString,
    timestamp: DateTime<Utc>,
    status: ComplianceStatus,
    details: String,
    devices_count: u32,
    jobs_count: u32,
    scan_id: ScanId,
}

impl ComplianceLogEntry {
    /// Materializes an input into an entry, using `recorded_at` when no timestamp was supplied.
    #[must_use]
    pub fn record(input: ComplianceLogEntryInput, id: Uuid, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            compliance_name: input.compliance_name,
            timestamp: input.timestamp.unwrap_or(recorded_at),
            status: input.status,
            details: input.details,
            devices_count: input.devices_count,
            jobs_count: input.jobs_count,
            scan_id: ScanId::FIRST,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the run label.
    #[must_use]
    pub fn compliance_name(&self) -> &NonEmptyString {
        &self.compliance_name
    }

    /// Returns the completion instant.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the run outcome.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    /// Returns the free-text run output.
    #[must_use]
    pub fn details(&self) -> &str {
        self.details.as_str()
    }

    /// Returns the number of devices covered by the run.
    #[must_use]
    pub fn devices_count(&self) -> u32 {
        self.devices_count
    }

    /// Returns the number of jobs executed by the run.
    #[must_use]
    pub fn jobs_count(&self) -> u32 {
        self.jobs_count
    }

    /// Returns the display label assigned at the last relabel pass.
    #[must_use]
    pub fn scan_id(&self) -> ScanId {
        self.scan_id
    }
}

/// Capacity-bounded compliance history ordered newest first.
///
/// Every mutation re-sorts by timestamp, evicts the oldest entries beyond
/// [`COMPLIANCE_LOG_CAPACITY`] and relabels the survivors so that the oldest
/// entry is `Scan 01` and the newest carries the entry count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceLog {
    entries: Vec<ComplianceLogEntry>,
}

impl ComplianceLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from stored entries, restoring every invariant.
    #[must_use]
    pub fn from_entries(entries: Vec<ComplianceLogEntry>) -> Self {
        let mut log = Self { entries };
        log.normalize();
        log
    }

    /// Inserts an entry, evicting and relabeling as needed.
    pub fn append(&mut self, entry: ComplianceLogEntry) {
        // Front insertion keeps the newer append first among equal timestamps.
        self.entries.insert(0, entry);
        self.normalize();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns entries newest first.
    #[must_use]
    pub fn entries(&self) -> &[ComplianceLogEntry] {
        &self.entries
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&mut self) {
        self.entries
            .sort_by(|left, right| right.timestamp().cmp(&left.timestamp()));
        self.entries.truncate(COMPLIANCE_LOG_CAPACITY);

        let count = self.entries.len();
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.scan_id = ScanId(count - position);
        }
    }
}
