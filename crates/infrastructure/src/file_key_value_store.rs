use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use switchboard_application::KeyValueStore;
use switchboard_core::{AppError, AppResult};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Key-value store keeping one `<key>.json` document per key in a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    directory: PathBuf,
}

impl FileKeyValueStore {
    /// Opens a store rooted at `directory`, creating it when missing.
    pub async fn open(directory: impl Into<PathBuf>) -> AppResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create data directory '{}': {error}",
                directory.display()
            ))
        })?;

        Ok(Self { directory })
    }

    /// Returns the data directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.directory.as_path()
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'));
        if !valid {
            return Err(AppError::Validation(format!(
                "storage key '{key}' may only contain letters, digits, '-' and '_'"
            )));
        }

        Ok(self.directory.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read '{}': {error}",
                path.display()
            ))),
        }
    }

    async fn write(&self, key: &str, value: String) -> AppResult<()> {
        let path = self.path_for(key)?;
        let staging = self.directory.join(format!(".{key}.{}.tmp", Uuid::new_v4()));

        fs::write(&staging, value.as_bytes())
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write '{}': {error}",
                    staging.display()
                ))
            })?;

        if let Err(error) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::Internal(format!(
                "failed to replace '{}': {error}",
                path.display()
            )));
        }

        debug!(key, bytes = value.len(), "stored record");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove '{}': {error}",
                path.display()
            ))),
        }
    }
}
