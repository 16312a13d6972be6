//! TOML-backed ImportCursorRepository implementation.

use async_trait::async_trait;
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::import::ImportCursorRepository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::AtomicFile;

/// Contents of `import_state.toml`:
///
/// ```toml
/// [offsets]
/// "messages.offset" = 40
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ImportState {
    #[serde(default)]
    offsets: BTreeMap<String, u64>,
}

/// Import cursors kept in a small TOML state file next to the store.
#[derive(Clone)]
pub struct TomlImportCursorRepository {
    file: Arc<AtomicFile<ImportState>>,
}

impl TomlImportCursorRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::toml(path)),
        }
    }
}

#[async_trait]
impl ImportCursorRepository for TomlImportCursorRepository {
    async fn load(&self, key: &str) -> Result<usize> {
        let file = self.file.clone();
        let state = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| PipelineError::internal(format!("Failed to join task: {}", e)))??;

        let offset = state
            .and_then(|state| state.offsets.get(key).copied())
            .unwrap_or(0);
        usize::try_from(offset)
            .map_err(|_| PipelineError::store(format!("Cursor '{}' out of range: {}", key, offset)))
    }

    async fn store(&self, key: &str, offset: usize) -> Result<()> {
        let file = self.file.clone();
        let key = key.to_string();
        let value = offset as u64;
        tokio::task::spawn_blocking(move || {
            file.update(ImportState::default(), |state| {
                state.offsets.insert(key, value);
                Ok(())
            })
        })
        .await
        .map_err(|e| PipelineError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!(offset, "Stored import cursor");
        Ok(())
    }
}
