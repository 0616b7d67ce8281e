use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use switchboard_core::AppResult;
use tokio::sync::RwLock;
use tracing::warn;

use crate::storage_ports::KeyValueStore;

/// Write-through collection persisted as one JSON array under a fixed key.
///
/// Memory is the source of truth for the running process. Storage failures are
/// logged and otherwise ignored.
pub struct PersistedCollection<T> {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    items: RwLock<Vec<T>>,
}

impl<T> PersistedCollection<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Loads the collection, starting empty when the record is missing or unreadable.
    pub async fn load(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        let items = read_json_record::<Vec<T>>(store.as_ref(), key)
            .await
            .unwrap_or_default();

        Self {
            key,
            store,
            items: RwLock::new(items),
        }
    }

    /// Returns a copy of every item in stored order.
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Applies a change to a draft copy and commits it only when the change succeeds.
    pub async fn mutate<R, F>(&self, change: F) -> AppResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<R> + Send,
        R: Send,
    {
        let mut items = self.items.write().await;
        let mut draft = items.clone();
        let result = change(&mut draft)?;

        persist_json_record(self.store.as_ref(), self.key, &draft).await;
        *items = draft;

        Ok(result)
    }

    /// Removes every item and the stored record.
    pub async fn clear(&self) {
        let mut items = self.items.write().await;
        remove_record(self.store.as_ref(), self.key).await;
        items.clear();
    }
}

pub(crate) async fn read_json_record<V>(store: &dyn KeyValueStore, key: &str) -> Option<V>
where
    V: DeserializeOwned,
{
    let raw = match store.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(key, error = %error, "failed to read persisted record");
            return None;
        }
    };

    match serde_json::from_str(raw.as_str()) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, error = %error, "discarding malformed persisted record");
            None
        }
    }
}

pub(crate) async fn persist_json_record<V>(store: &dyn KeyValueStore, key: &str, value: &V)
where
    V: Serialize + ?Sized,
{
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(error) => {
            warn!(key, error = %error, "failed to encode persisted record");
            return;
        }
    };

    if let Err(error) = store.write(key, encoded).await {
        warn!(key, error = %error, "failed to persist record; keeping in-memory state");
    }
}

pub(crate) async fn remove_record(store: &dyn KeyValueStore, key: &str) {
    if let Err(error) = store.remove(key).await {
        warn!(key, error = %error, "failed to remove persisted record");
    }
}
