use std::sync::Arc;

use chrono::Utc;
use switchboard_domain::{ComplianceLog, ComplianceLogEntry, ComplianceLogEntryInput};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::persisted_collection::{persist_json_record, read_json_record, remove_record};
use crate::storage_ports::{KeyValueStore, storage_keys};

/// Durable, capped and relabeled history of compliance run results.
///
/// Appends hold the write lock across the persistence call, so appends within
/// one process never interleave. A failed storage write is logged and the
/// in-memory log stays authoritative for the rest of the process lifetime.
#[derive(Clone)]
pub struct ComplianceLogStore {
    store: Arc<dyn KeyValueStore>,
    log: Arc<RwLock<ComplianceLog>>,
}

impl ComplianceLogStore {
    /// Loads the store from its persisted record.
    ///
    /// A missing or malformed record yields an empty log. Entries that fail
    /// validation are skipped; the rest are re-sorted, capped and relabeled.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = read_json_record::<Vec<serde_json::Value>>(
            store.as_ref(),
            storage_keys::COMPLIANCE_LOGS,
        )
        .await
        .unwrap_or_default()
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<ComplianceLogEntry>(record) {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(error = %error, "skipping invalid stored compliance log entry");
                None
            }
        })
        .collect();

        Self {
            store,
            log: Arc::new(RwLock::new(ComplianceLog::from_entries(entries))),
        }
    }

    /// Returns every retained entry, newest first.
    pub async fn get(&self) -> Vec<ComplianceLogEntry> {
        self.log.read().await.entries().to_vec()
    }

    /// Records a completed run.
    pub async fn append(&self, input: ComplianceLogEntryInput) {
        let entry = ComplianceLogEntry::record(input, Uuid::new_v4(), Utc::now());
        let entry_id = entry.id();

        let mut log = self.log.write().await;
        let mut next = log.clone();
        next.append(entry);

        persist_json_record(
            self.store.as_ref(),
            storage_keys::COMPLIANCE_LOGS,
            next.entries(),
        )
        .await;
        *log = next;

        debug!(
            entry_id = %entry_id,
            retained = log.len(),
            "compliance log entry appended"
        );
    }

    /// Drops every entry and the persisted record.
    pub async fn clear(&self) {
        let mut log = self.log.write().await;
        remove_record(self.store.as_ref(), storage_keys::COMPLIANCE_LOGS).await;
        log.clear();
    }
}

#[cfg(test)]
mod tests;
