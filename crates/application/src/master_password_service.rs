use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use switchboard_core::{AppError, AppResult};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::persisted_collection::{read_json_record, remove_record};
use crate::storage_ports::{KeyValueStore, storage_keys};

/// Minimum accepted master password length, in characters.
pub const MIN_MASTER_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted master password length, in characters.
pub const MAX_MASTER_PASSWORD_LENGTH: usize = 256;

/// Port for password hashing operations. Keeps the application layer free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MasterPasswordRecord {
    hash: String,
    updated_at: DateTime<Utc>,
}

/// Application service guarding destructive operations with a master password.
#[derive(Clone)]
pub struct MasterPasswordService {
    store: Arc<dyn KeyValueStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    record: Arc<RwLock<Option<MasterPasswordRecord>>>,
}

impl MasterPasswordService {
    /// Loads the current password hash, if one was set.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let record =
            read_json_record::<MasterPasswordRecord>(store.as_ref(), storage_keys::MASTER_PASSWORD)
                .await;

        Self {
            store,
            password_hasher,
            record: Arc::new(RwLock::new(record)),
        }
    }

    /// Returns whether a master password has been set.
    pub async fn is_configured(&self) -> bool {
        self.record.read().await.is_some()
    }

    /// Returns when the password was last changed.
    pub async fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.record
            .read()
            .await
            .as_ref()
            .map(|record| record.updated_at)
    }

    /// Sets or replaces the master password.
    ///
    /// Replacing an existing password requires the current one. Unlike the
    /// other records, a failed write is reported to the caller.
    pub async fn set_password(&self, current: Option<&str>, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;

        let mut record = self.record.write().await;
        if let Some(existing) = record.as_ref() {
            let verified = match current {
                Some(current) => self
                    .password_hasher
                    .verify_password(current, existing.hash.as_str())?,
                None => false,
            };
            if !verified {
                warn!("rejected master password change with wrong current password");
                return Err(AppError::Unauthorized(
                    "current master password is incorrect".to_owned(),
                ));
            }
        }

        let next = MasterPasswordRecord {
            hash: self.password_hasher.hash_password(new_password)?,
            updated_at: Utc::now(),
        };
        let encoded = serde_json::to_string(&next).map_err(|error| {
            AppError::Internal(format!("failed to encode master password record: {error}"))
        })?;
        self.store
            .write(storage_keys::MASTER_PASSWORD, encoded)
            .await?;
        *record = Some(next);

        info!("master password updated");
        Ok(())
    }

    /// Checks a candidate password.
    pub async fn verify(&self, password: &str) -> AppResult<bool> {
        let record = self.record.read().await;
        let Some(existing) = record.as_ref() else {
            return Err(AppError::NotFound(
                "master password has not been set".to_owned(),
            ));
        };

        self.password_hasher
            .verify_password(password, existing.hash.as_str())
    }

    /// Forgets the master password.
    pub async fn clear(&self) {
        let mut record = self.record.write().await;
        remove_record(self.store.as_ref(), storage_keys::MASTER_PASSWORD).await;
        *record = None;
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    let length = password.chars().count();
    if length < MIN_MASTER_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "master password must be at least {MIN_MASTER_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_MASTER_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "master password must be at most {MAX_MASTER_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}
