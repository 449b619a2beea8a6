use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use vg_core::ports::{LocalCacheError, LocalCachePort};

/// Process-local cache. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryLocalCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryLocalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalCachePort for InMemoryLocalCache {
    fn get(&self, key: &str) -> Result<Option<String>, LocalCacheError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalCacheError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), LocalCacheError> {
        self.lock().remove(key);
        Ok(())
    }
}
