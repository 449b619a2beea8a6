use anyhow::Result;

/// Host-application callback fired when the whole sequence has been watched.
#[async_trait::async_trait]
pub trait UnlockSignalPort: Send + Sync {
    async fn emit_unlocked(&self) -> Result<()>;
}
