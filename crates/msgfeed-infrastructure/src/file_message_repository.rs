//! JSON-file backed MessageRepository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::message::{Message, MessageRepository, PageRequest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::AtomicFile;

/// On-disk layout of the store file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    next_seq: u64,
    #[serde(default)]
    messages: Vec<StoredMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMessage {
    /// Insertion sequence; breaks timestamp ties.
    seq: u64,
    #[serde(flatten)]
    message: Message,
}

#[derive(Debug, Clone)]
struct IndexedMessage {
    seq: u64,
    at: DateTime<Utc>,
    message: Message,
}

/// In-memory index over the stored messages.
///
/// `order` is keyed by `(timestamp, seq)`, so iterating it in reverse yields
/// newest-first with later insertions ahead of earlier ones on equal timestamps.
#[derive(Debug, Clone, Default)]
struct StoreIndex {
    next_seq: u64,
    entries: HashMap<String, IndexedMessage>,
    order: BTreeMap<(DateTime<Utc>, u64), String>,
}

impl StoreIndex {
    fn from_document(document: StoreDocument) -> Result<Self> {
        let mut index = Self {
            next_seq: document.next_seq,
            ..Self::default()
        };
        for stored in document.messages {
            let at = stored.message.parsed_timestamp().map_err(|e| {
                PipelineError::store(format!("Corrupt message store: {}", e))
            })?;
            index.next_seq = index.next_seq.max(stored.seq + 1);
            index.put(stored.seq, at, stored.message);
        }
        Ok(index)
    }

    fn to_document(&self) -> StoreDocument {
        let mut messages: Vec<StoredMessage> = self
            .entries
            .values()
            .map(|entry| StoredMessage {
                seq: entry.seq,
                message: entry.message.clone(),
            })
            .collect();
        messages.sort_by_key(|stored| stored.seq);
        StoreDocument {
            next_seq: self.next_seq,
            messages,
        }
    }

    /// Inserts or replaces by id. A replaced message keeps its original
    /// insertion sequence.
    fn upsert(&mut self, at: DateTime<Utc>, message: Message) {
        let seq = match self.entries.get(&message.id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.put(seq, at, message);
    }

    fn put(&mut self, seq: u64, at: DateTime<Utc>, message: Message) {
        if let Some(previous) = self.entries.remove(&message.id) {
            self.order.remove(&(previous.at, previous.seq));
        }
        self.order.insert((at, seq), message.id.clone());
        self.entries
            .insert(message.id.clone(), IndexedMessage { seq, at, message });
    }

    fn page(&self, page: PageRequest) -> Vec<Message> {
        let mut selected: Vec<Message> = self
            .order
            .values()
            .rev()
            .skip(page.offset)
            .take(page.limit)
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.message.clone())
            .collect();
        selected.reverse();
        selected
    }
}

/// Message store persisted as a single JSON document.
///
/// Every committed batch rewrites the document atomically; the in-memory
/// index is swapped only after the write succeeded, so a failed persist
/// leaves both disk and memory at the previous state.
///
/// ```text
/// data_dir/
/// └── messages.json
/// ```
#[derive(Debug)]
pub struct FileMessageRepository {
    index: Mutex<StoreIndex>,
    /// `None` for the in-memory variant.
    file: Option<Arc<AtomicFile<StoreDocument>>>,
}

impl FileMessageRepository {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `Store` error if the file exists but cannot be read or parsed.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let file = Arc::new(AtomicFile::json(path));
        let loader = file.clone();
        let document = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| PipelineError::internal(format!("Failed to join task: {}", e)))??;

        let index = match document {
            Some(document) => StoreIndex::from_document(document)?,
            None => StoreIndex::default(),
        };
        tracing::info!(
            path = %file.path().display(),
            messages = index.entries.len(),
            "Opened message store"
        );

        Ok(Self {
            index: Mutex::new(index),
            file: Some(file),
        })
    }

    /// Creates a store that lives only as long as this value (tests, dry runs).
    pub fn in_memory() -> Self {
        Self {
            index: Mutex::new(StoreIndex::default()),
            file: None,
        }
    }
}

#[async_trait]
impl MessageRepository for FileMessageRepository {
    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<Message>> {
        let index = self.index.lock().await;
        Ok(index.page(page))
    }

    async fn write_batch(&self, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        // Validate everything before touching any state.
        let validated = messages
            .iter()
            .map(|message| message.parsed_timestamp().map(|at| (at, message.clone())))
            .collect::<Result<Vec<_>>>()?;

        let mut index = self.index.lock().await;
        let mut next = index.clone();
        for (at, message) in validated {
            next.upsert(at, message);
        }

        if let Some(file) = &self.file {
            let document = next.to_document();
            let file = file.clone();
            tokio::task::spawn_blocking(move || file.save(&document))
                .await
                .map_err(|e| PipelineError::internal(format!("Failed to join task: {}", e)))??;
        }

        *index = next;
        tracing::debug!(
            batch = messages.len(),
            total = index.entries.len(),
            "Committed message batch"
        );
        Ok(())
    }

    async fn existing_ids(&self, candidates: &[String]) -> Result<HashSet<String>> {
        let index = self.index.lock().await;
        Ok(candidates
            .iter()
            .filter(|id| index.entries.contains_key(id.as_str()))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.index.lock().await.entries.len())
    }
}
