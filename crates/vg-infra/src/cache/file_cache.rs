//! File-based local cache
//!
//! This module provides a file-based implementation of the LocalCachePort,
//! persisting the key/value map to a JSON file so the UnlockFlag and the
//! auth-owned identity keys survive restarts.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use vg_core::ports::{LocalCacheError, LocalCachePort};

pub const DEFAULT_CACHE_FILE: &str = "local_cache.json";

type Entries = BTreeMap<String, String>;

pub struct FileLocalCache {
    cache_file_path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileLocalCache {
    /// Create cache with custom file path
    pub fn new(cache_file_path: PathBuf) -> Self {
        Self {
            cache_file_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Create cache with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.cache_file_path
    }

    fn load(&self) -> Result<Entries, LocalCacheError> {
        if !self.cache_file_path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(&self.cache_file_path)
            .map_err(|e| LocalCacheError::Io(format!("Failed to read cache file: {e}")))?;

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| LocalCacheError::Corrupt(format!("Failed to parse cache file: {e}")))
    }

    fn store(&self, entries: &Entries) -> Result<(), LocalCacheError> {
        if let Some(parent) = self.cache_file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LocalCacheError::Io(format!("Failed to create cache dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| LocalCacheError::Corrupt(format!("Failed to serialize cache: {e}")))?;

        let mut file = fs::File::create(&self.cache_file_path)
            .map_err(|e| LocalCacheError::Io(format!("Failed to create cache file: {e}")))?;

        file.write_all(json.as_bytes())
            .map_err(|e| LocalCacheError::Io(format!("Failed to write cache file: {e}")))?;

        file.sync_all()
            .map_err(|e| LocalCacheError::Io(format!("Failed to sync cache file: {e}")))?;

        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), LocalCacheError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        apply(&mut entries);
        self.store(&entries)
    }
}

impl LocalCachePort for FileLocalCache {
    fn get(&self, key: &str) -> Result<Option<String>, LocalCacheError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LocalCacheError> {
        debug!(key, path = %self.cache_file_path.display(), "Writing local cache entry");
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), LocalCacheError> {
        debug!(key, path = %self.cache_file_path.display(), "Removing local cache entry");
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
