use std::sync::Arc;

use switchboard_application::KeyValueStore;
use switchboard_core::AppResult;
use switchboard_infrastructure::{FileKeyValueStore, InMemoryKeyValueStore};
use tracing::{info, warn};

use crate::api_config::StorageBackendConfig;

pub async fn build_key_value_store(
    config: &StorageBackendConfig,
) -> AppResult<Arc<dyn KeyValueStore>> {
    match config {
        StorageBackendConfig::File { data_dir } => {
            let store = FileKeyValueStore::open(data_dir.clone()).await?;
            info!(data_dir = %store.directory().display(), "using file storage backend");
            Ok(Arc::new(store))
        }
        StorageBackendConfig::Memory => {
            warn!("using in-memory storage backend; data is lost on restart");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
    }
}
