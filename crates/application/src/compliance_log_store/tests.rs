use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use switchboard_domain::{ComplianceLogEntryInput, ComplianceStatus};

use super::ComplianceLogStore;
use crate::storage_ports::{KeyValueStore, storage_keys};
use crate::test_support::MemoryStore;

fn run_started() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 6, 30, 0)
        .single()
        .unwrap_or_else(|| unreachable!())
}

fn input(name: &str) -> ComplianceLogEntryInput {
    ComplianceLogEntryInput::new(name, ComplianceStatus::Success, "all checks passed", 1, 1)
        .unwrap_or_else(|_| unreachable!())
}

async fn stored_entries(store: &MemoryStore) -> Vec<Value> {
    let raw = store
        .raw(storage_keys::COMPLIANCE_LOGS)
        .await
        .unwrap_or_else(|| unreachable!("record should be persisted"));
    serde_json::from_str(raw.as_str()).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn ad_hoc_run_is_persisted_as_scan_01() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store.clone() as Arc<dyn KeyValueStore>).await;

    log_store
        .append(
            ComplianceLogEntryInput::new("Ad-hoc Run", ComplianceStatus::Success, "", 3, 2)
                .unwrap_or_else(|_| unreachable!()),
        )
        .await;

    let entries = log_store.get().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].scan_id().to_string(), "Scan 01");

    let stored = stored_entries(&store).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["complianceName"], "Ad-hoc Run");
    assert_eq!(stored[0]["scanId"], "Scan 01");
    assert_eq!(stored[0]["devicesCount"], 3);
    assert_eq!(stored[0]["jobsCount"], 2);
    assert_eq!(stored[0]["id"], entries[0].id().to_string());
}

#[tokio::test]
async fn missing_timestamp_defaults_to_append_time() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;

    let before = Utc::now();
    log_store.append(input("now")).await;
    let after = Utc::now();

    let timestamp = log_store.get().await[0].timestamp();
    assert!(timestamp >= before && timestamp <= after);
}

#[tokio::test]
async fn eleventh_run_evicts_the_oldest() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store.clone() as Arc<dyn KeyValueStore>).await;

    for index in 1..=11 {
        log_store
            .append(
                input(format!("T{index}").as_str())
                    .with_timestamp(run_started() + Duration::minutes(index)),
            )
            .await;
    }

    let entries = log_store.get().await;
    let summary: Vec<(String, String)> = entries
        .iter()
        .map(|entry| {
            (
                entry.compliance_name().as_str().to_owned(),
                entry.scan_id().to_string(),
            )
        })
        .collect();
    let expected: Vec<(String, String)> = (2..=11)
        .rev()
        .map(|index| (format!("T{index}"), format!("Scan {:02}", index - 1)))
        .collect();
    assert_eq!(summary, expected);

    let stored = stored_entries(&store).await;
    assert_eq!(stored.len(), 10);
    assert_eq!(stored[0]["complianceName"], "T11");
    assert_eq!(stored[9]["scanId"], "Scan 01");
}

#[tokio::test]
async fn storage_failure_still_updates_memory() {
    let store = Arc::new(MemoryStore::failing_writes());
    let log_store = ComplianceLogStore::load(store.clone() as Arc<dyn KeyValueStore>).await;

    log_store.append(input("first")).await;
    log_store.append(input("second")).await;

    assert_eq!(store.write_attempts(), 2);
    assert_eq!(store.raw(storage_keys::COMPLIANCE_LOGS).await, None);

    let entries = log_store.get().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].compliance_name().as_str(), "second");
    assert_eq!(entries[0].scan_id().to_string(), "Scan 02");
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    log_store.append(input("a")).await;
    log_store.append(input("b")).await;

    assert_eq!(log_store.get().await, log_store.get().await);
}

#[tokio::test]
async fn reload_restores_persisted_history() {
    let store = Arc::new(MemoryStore::default());
    let first = ComplianceLogStore::load(store.clone() as Arc<dyn KeyValueStore>).await;
    for index in 0..3 {
        first
            .append(input("run").with_timestamp(run_started() + Duration::seconds(index)))
            .await;
    }

    let reloaded = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    assert_eq!(reloaded.get().await, first.get().await);
}

#[tokio::test]
async fn load_normalizes_hand_edited_record() {
    let store = Arc::new(MemoryStore::default());
    store
        .put(
            storage_keys::COMPLIANCE_LOGS,
            r#"[
                {"id":"6f1c1f0e-8a53-4a53-9d86-0a3f0d0b5c01","complianceName":"older","timestamp":"2026-01-01T00:00:00Z","status":"Failed","details":"","devicesCount":1,"jobsCount":1,"scanId":"Scan 09"},
                {"id":"6f1c1f0e-8a53-4a53-9d86-0a3f0d0b5c02","complianceName":"newer","timestamp":"2026-01-02T00:00:00Z","status":"Partial Success","details":"","devicesCount":2,"jobsCount":1,"scanId":"Scan 04"}
            ]"#,
        )
        .await;

    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    let entries = log_store.get().await;

    assert_eq!(entries[0].compliance_name().as_str(), "newer");
    assert_eq!(entries[0].scan_id().to_string(), "Scan 02");
    assert_eq!(entries[0].status(), ComplianceStatus::PartialSuccess);
    assert_eq!(entries[1].scan_id().to_string(), "Scan 01");
}

#[tokio::test]
async fn load_skips_entries_with_blank_names() {
    let store = Arc::new(MemoryStore::default());
    store
        .put(
            storage_keys::COMPLIANCE_LOGS,
            r#"[
                {"id":"6f1c1f0e-8a53-4a53-9d86-0a3f0d0b5c01","complianceName":"   ","timestamp":"2026-01-03T00:00:00Z","status":"Success","details":"","devicesCount":1,"jobsCount":1,"scanId":"Scan 01"},
                {"id":"6f1c1f0e-8a53-4a53-9d86-0a3f0d0b5c02","complianceName":"nightly","timestamp":"2026-01-02T00:00:00Z","status":"Failed","details":"","devicesCount":1,"jobsCount":1,"scanId":"Scan 02"}
            ]"#,
        )
        .await;

    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    let entries = log_store.get().await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].compliance_name().as_str(), "nightly");
    assert_eq!(entries[0].scan_id().to_string(), "Scan 01");
}

#[tokio::test]
async fn malformed_record_starts_empty() {
    let store = Arc::new(MemoryStore::default());
    store.put(storage_keys::COMPLIANCE_LOGS, "[{\"id\":").await;

    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    assert!(log_store.get().await.is_empty());
}

#[tokio::test]
async fn clear_empties_memory_and_storage() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store.clone() as Arc<dyn KeyValueStore>).await;
    log_store.append(input("a")).await;

    log_store.clear().await;

    assert!(log_store.get().await.is_empty());
    assert_eq!(store.raw(storage_keys::COMPLIANCE_LOGS).await, None);
}

#[tokio::test]
async fn clones_share_one_history() {
    let store = Arc::new(MemoryStore::default());
    let log_store = ComplianceLogStore::load(store as Arc<dyn KeyValueStore>).await;
    let producer = log_store.clone();

    producer.append(input("from clone")).await;

    assert_eq!(log_store.get().await.len(), 1);
}
