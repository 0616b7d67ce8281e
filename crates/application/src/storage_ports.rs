use async_trait::async_trait;
use switchboard_core::AppResult;

/// Fixed storage keys for every persisted record.
pub mod storage_keys {
    /// Device list.
    pub const DEVICES: &str = "devices";
    /// Job definitions.
    pub const JOBS: &str = "jobs";
    /// Capped compliance history.
    pub const COMPLIANCE_LOGS: &str = "complianceLogs";
    /// Scheduled compliance runs.
    pub const SCHEDULED_JOBS: &str = "scheduledJobs";
    /// Master password hash.
    pub const MASTER_PASSWORD: &str = "masterPassword";

    /// Every key owned by the application, in clearing order.
    pub const ALL: &[&str] = &[
        DEVICES,
        JOBS,
        COMPLIANCE_LOGS,
        SCHEDULED_JOBS,
        MASTER_PASSWORD,
    ];
}

/// Durable key-value persistence port. Values are whole JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored document for a key, if any.
    async fn read(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the stored document for a key.
    async fn write(&self, key: &str, value: String) -> AppResult<()>;

    /// Deletes a key. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
