use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use switchboard_core::{AppError, AppResult};
use tokio::sync::Mutex;

use crate::{PasswordHasher, RandomSource, storage_ports::KeyValueStore};

#[derive(Default)]
pub(crate) struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }

    pub(crate) async fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
    }

    pub(crate) async fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }

    pub(crate) fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> AppResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("quota exceeded".to_owned()));
        }

        self.values.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// Replays a fixed sequence of draws, then repeats the last one.
pub(crate) struct ScriptedRandom {
    draws: std::sync::Mutex<Vec<f64>>,
}

impl ScriptedRandom {
    pub(crate) fn new(mut draws: Vec<f64>) -> Self {
        draws.reverse();
        Self {
            draws: std::sync::Mutex::new(draws),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> AppResult<f64> {
        let mut draws = self
            .draws
            .lock()
            .map_err(|_| AppError::Internal("scripted draws poisoned".to_owned()))?;
        if draws.len() > 1 {
            Ok(draws.pop().unwrap_or(0.0))
        } else {
            Ok(draws.last().copied().unwrap_or(0.0))
        }
    }
}

/// Random source whose every draw fails.
pub(crate) struct FailingRandom;

impl RandomSource for FailingRandom {
    fn next_unit(&self) -> AppResult<f64> {
        Err(AppError::Internal("entropy unavailable".to_owned()))
    }
}

/// Reversible stand-in for a real password hasher.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}
