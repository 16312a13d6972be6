//! Import cursor repository trait.

use async_trait::async_trait;

use crate::error::Result;

/// Builds the key an import cursor is persisted under for a source dataset.
pub fn cursor_key(source_name: &str) -> String {
    format!("{}.offset", source_name)
}

/// Durable storage for import progress, kept outside the message store.
#[async_trait]
pub trait ImportCursorRepository: Send + Sync {
    /// Loads the offset stored under `key`, or `0` if none was ever stored.
    async fn load(&self, key: &str) -> Result<usize>;

    /// Persists `offset` under `key`.
    async fn store(&self, key: &str, offset: usize) -> Result<()>;

    async fn reset(&self, key: &str) -> Result<()> {
        self.store(key, 0).await
    }
}
