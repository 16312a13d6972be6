//! Windowed, idempotent import of a source dataset into the message store.

use msgfeed_core::config::DEFAULT_CHUNK_SIZE;
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::import::{
    ChunkReport, ImportCursorRepository, ImportOutcome, MessageSource, cursor_key, parse_entry,
};
use msgfeed_core::message::{Message, MessageRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Moves messages from a static source into the store, one window per call.
///
/// Progress is tracked by a durable cursor. The cursor only moves after
/// the window's batch write succeeded: a crash in between re-imports a
/// window whose ids are already stored, which the existence check filters
/// out again.
pub struct ChunkImporter {
    source: Arc<dyn MessageSource>,
    repository: Arc<dyn MessageRepository>,
    cursors: Arc<dyn ImportCursorRepository>,
    chunk_size: usize,
    cursor_key: String,
}

impl ChunkImporter {
    /// Creates an importer with the default chunk size.
    pub fn new(
        source: Arc<dyn MessageSource>,
        repository: Arc<dyn MessageRepository>,
        cursors: Arc<dyn ImportCursorRepository>,
    ) -> Self {
        let cursor_key = cursor_key(source.name());
        Self {
            source,
            repository,
            cursors,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cursor_key,
        }
    }

    /// Sets the number of source entries processed per call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PipelineError::invalid_argument("chunk_size must be positive"));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Current import cursor.
    pub async fn cursor(&self) -> Result<usize> {
        self.cursors.load(&self.cursor_key).await
    }

    /// Imports the next window of the source.
    ///
    /// # Returns
    ///
    /// - `Ok(ImportOutcome::Imported(_))`: window processed, cursor advanced
    /// - `Ok(ImportOutcome::Complete)`: cursor already at the end of the source
    /// - `Err(SourceData)`: source missing or malformed; nothing changed
    /// - `Err(_)`: store or cursor failure; the cursor was not advanced
    pub async fn import_next_chunk(&self) -> Result<ImportOutcome> {
        let entries = self.source.load_entries().await?;

        let start = self.cursors.load(&self.cursor_key).await?;
        if start >= entries.len() {
            tracing::debug!(
                source = self.source.name(),
                cursor = start,
                total = entries.len(),
                "All source data imported"
            );
            return Ok(ImportOutcome::Complete);
        }

        let end = start.saturating_add(self.chunk_size).min(entries.len());
        let mut report = ChunkReport::new(start..end);

        // Last entry wins for repeated ids; the slot of the first occurrence is kept.
        let mut candidates: Vec<Message> = Vec::with_capacity(end - start);
        let mut slots: HashMap<String, usize> = HashMap::new();
        for (offset, raw) in entries[start..end].iter().enumerate() {
            let Some(message) = parse_entry(raw) else {
                tracing::debug!(index = start + offset, "Skipping malformed source entry");
                report.malformed += 1;
                continue;
            };
            match slots.get(&message.id) {
                Some(&slot) => {
                    candidates[slot] = message;
                    report.duplicates += 1;
                }
                None => {
                    slots.insert(message.id.clone(), candidates.len());
                    candidates.push(message);
                }
            }
        }

        let ids: Vec<String> = candidates.iter().map(|m| m.id.clone()).collect();
        let existing = self.repository.existing_ids(&ids).await?;
        candidates.retain(|m| !existing.contains(&m.id));
        report.already_stored = existing.len();

        self.repository.write_batch(&candidates).await?;
        report.written = candidates.len();

        self.cursors.store(&self.cursor_key, end).await?;

        tracing::info!(
            source = self.source.name(),
            start,
            end,
            written = report.written,
            already_stored = report.already_stored,
            malformed = report.malformed,
            "Imported source chunk"
        );
        Ok(ImportOutcome::Imported(report))
    }

    /// Rewinds the cursor to the start of the source. Stored messages are kept.
    pub async fn reset_import(&self) -> Result<()> {
        self.cursors.reset(&self.cursor_key).await?;
        tracing::info!(source = self.source.name(), "Reset import cursor");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FlakyRepository, MemoryCursors, StaticSource, entry, entries};
    use msgfeed_core::message::PageRequest;
    use serde_json::json;

    fn importer(
        source: StaticSource,
        repository: Arc<dyn MessageRepository>,
        chunk_size: usize,
    ) -> ChunkImporter {
        ChunkImporter::new(Arc::new(source), repository, Arc::new(MemoryCursors::default()))
            .with_chunk_size(chunk_size)
            .unwrap()
    }

    #[tokio::test]
    async fn test_windows_advance_cursor() {
        let repository = Arc::new(FlakyRepository::default());
        let importer = importer(StaticSource::new(entries(45)), repository.clone(), 20);

        let first = importer.import_next_chunk().await.unwrap();
        assert_eq!(first.written(), 20);
        assert_eq!(importer.cursor().await.unwrap(), 20);

        importer.import_next_chunk().await.unwrap();
        let third = importer.import_next_chunk().await.unwrap();
        match third {
            ImportOutcome::Imported(report) => {
                assert_eq!(report.window, 40..45);
                assert_eq!(report.written, 5);
            }
            ImportOutcome::Complete => panic!("expected a partial window"),
        }
        assert_eq!(importer.cursor().await.unwrap(), 45);
        assert_eq!(repository.count().await.unwrap(), 45);
    }

    #[tokio::test]
    async fn test_huge_chunk_size_takes_the_rest_of_the_source() {
        let repository: Arc<dyn MessageRepository> = Arc::new(FlakyRepository::default());
        let source = Arc::new(StaticSource::new(entries(5)));
        let cursors = Arc::new(MemoryCursors::default());

        let small = ChunkImporter::new(source.clone(), repository.clone(), cursors.clone())
            .with_chunk_size(2)
            .unwrap();
        small.import_next_chunk().await.unwrap();
        assert_eq!(small.cursor().await.unwrap(), 2);

        let huge = ChunkImporter::new(source, repository.clone(), cursors)
            .with_chunk_size(usize::MAX)
            .unwrap();
        match huge.import_next_chunk().await.unwrap() {
            ImportOutcome::Imported(report) => {
                assert_eq!(report.window, 2..5);
                assert_eq!(report.written, 3);
            }
            ImportOutcome::Complete => panic!("expected the remaining window"),
        }
        assert_eq!(huge.cursor().await.unwrap(), 5);
        assert_eq!(repository.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_import_is_idempotent_after_end() {
        let repository = Arc::new(FlakyRepository::default());
        let importer = importer(StaticSource::new(entries(3)), repository.clone(), 20);

        importer.import_next_chunk().await.unwrap();
        let writes_after_import = repository.write_calls();

        for _ in 0..3 {
            let outcome = importer.import_next_chunk().await.unwrap();
            assert!(outcome.is_complete());
        }
        assert_eq!(repository.write_calls(), writes_after_import);
        assert_eq!(importer.cursor().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reset_reimports_nothing_new() {
        let repository = Arc::new(FlakyRepository::default());
        let importer = importer(StaticSource::new(entries(10)), repository.clone(), 20);

        importer.import_next_chunk().await.unwrap();
        importer.reset_import().await.unwrap();
        assert_eq!(importer.cursor().await.unwrap(), 0);

        match importer.import_next_chunk().await.unwrap() {
            ImportOutcome::Imported(report) => {
                assert_eq!(report.written, 0);
                assert_eq!(report.already_stored, 10);
            }
            ImportOutcome::Complete => panic!("reset should re-attempt the first window"),
        }
        assert_eq!(repository.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped_not_fatal() {
        let repository = Arc::new(FlakyRepository::default());
        let raw = vec![
            entry(0),
            json!({ "id": "no-text", "isSender": true, "timestamp": "2025-08-01T10:00:00Z", "author": "" }),
            json!({ "id": "bad-time", "text": "x", "isSender": true, "timestamp": "soon", "author": "" }),
            json!("not an object"),
            entry(1),
        ];
        let importer = importer(StaticSource::new(raw), repository.clone(), 20);

        match importer.import_next_chunk().await.unwrap() {
            ImportOutcome::Imported(report) => {
                assert_eq!(report.window, 0..5);
                assert_eq!(report.written, 2);
                assert_eq!(report.malformed, 3);
            }
            ImportOutcome::Complete => panic!("expected an import"),
        }
        assert_eq!(importer.cursor().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_ids_in_window_last_one_wins() {
        let repository = Arc::new(FlakyRepository::default());
        let mut replacement = entry(0);
        replacement["text"] = json!("second copy");
        let importer = importer(
            StaticSource::new(vec![entry(0), entry(1), replacement]),
            repository.clone(),
            20,
        );

        match importer.import_next_chunk().await.unwrap() {
            ImportOutcome::Imported(report) => {
                assert_eq!(report.written, 2);
                assert_eq!(report.duplicates, 1);
            }
            ImportOutcome::Complete => panic!("expected an import"),
        }

        let stored = repository.fetch_page(PageRequest::new(10, 0)).await.unwrap();
        let m0 = stored.iter().find(|m| m.id == "m0").unwrap();
        assert_eq!(m0.text, "second copy");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cursor() {
        let repository = Arc::new(FlakyRepository::default());
        let importer = importer(StaticSource::new(entries(30)), repository.clone(), 20);

        repository.fail_writes(true);
        let err = importer.import_next_chunk().await.unwrap_err();
        assert!(err.is_store());
        assert_eq!(importer.cursor().await.unwrap(), 0);

        repository.fail_writes(false);
        let retried = importer.import_next_chunk().await.unwrap();
        assert_eq!(retried.written(), 20);
        assert_eq!(importer.cursor().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_missing_source_changes_nothing() {
        let repository = Arc::new(FlakyRepository::default());
        let importer = importer(StaticSource::unavailable(), repository.clone(), 20);

        let err = importer.import_next_chunk().await.unwrap_err();
        assert!(err.is_source_data());
        assert_eq!(importer.cursor().await.unwrap(), 0);
        assert_eq!(repository.write_calls(), 0);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = ChunkImporter::new(
            Arc::new(StaticSource::new(Vec::new())),
            Arc::new(FlakyRepository::default()),
            Arc::new(MemoryCursors::default()),
        )
        .with_chunk_size(0);
        assert!(result.is_err());
    }
}
