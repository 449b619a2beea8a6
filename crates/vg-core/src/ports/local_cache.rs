use thiserror::Error;

/// Cache key of the UnlockFlag.
pub const UNLOCK_FLAG_KEY: &str = "genderIdentificationUnlocked";

const UNLOCK_FLAG_SET: &str = "true";

/// Local cache errors.
#[derive(Debug, Error)]
pub enum LocalCacheError {
    /// The backing store could not be read or written.
    #[error("local cache io failed: {0}")]
    Io(String),

    /// Stored data is corrupt or invalid.
    #[error("local cache data corrupt: {0}")]
    Corrupt(String),
}

/// Durable key/value store scoped to the participant's device.
///
/// No transactional guarantees: last write wins.
pub trait LocalCachePort: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, LocalCacheError>;

    /// Set a value by key, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), LocalCacheError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), LocalCacheError>;

    /// Whether the UnlockFlag is set.
    fn unlock_flag(&self) -> Result<bool, LocalCacheError> {
        Ok(self.get(UNLOCK_FLAG_KEY)?.as_deref() == Some(UNLOCK_FLAG_SET))
    }

    fn set_unlock_flag(&self) -> Result<(), LocalCacheError> {
        self.set(UNLOCK_FLAG_KEY, UNLOCK_FLAG_SET)
    }

    fn clear_unlock_flag(&self) -> Result<(), LocalCacheError> {
        self.remove(UNLOCK_FLAG_KEY)
    }
}

#[cfg(test)]
mockall::mock! {
    pub LocalCache {}

    impl LocalCachePort for LocalCache {
        fn get(&self, key: &str) -> Result<Option<String>, LocalCacheError>;
        fn set(&self, key: &str, value: &str) -> Result<(), LocalCacheError>;
        fn remove(&self, key: &str) -> Result<(), LocalCacheError>;
    }
}
