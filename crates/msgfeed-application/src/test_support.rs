//! Test doubles shared by the application unit tests.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::import::{ImportCursorRepository, MessageSource};
use msgfeed_core::message::{Message, MessageRepository, PageRequest, format_timestamp};
use msgfeed_infrastructure::FileMessageRepository;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Source entry `n`. Higher `n` means an older timestamp, so index 0 is the
/// newest message of the dataset.
pub fn entry(n: usize) -> Value {
    let base = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
    let at = base - Duration::minutes(n as i64);
    let author = if n % 2 == 0 { "ME" } else { "Anna" };
    json!({
        "id": format!("m{}", n),
        "text": format!("message {}", n),
        "isSender": n % 2 == 0,
        "timestamp": format_timestamp(at),
        "author": author,
    })
}

pub fn entries(count: usize) -> Vec<Value> {
    (0..count).map(entry).collect()
}

pub struct StaticSource {
    entries: Option<Vec<Value>>,
}

impl StaticSource {
    pub fn new(entries: Vec<Value>) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    pub fn unavailable() -> Self {
        Self { entries: None }
    }
}

#[async_trait]
impl MessageSource for StaticSource {
    fn name(&self) -> &str {
        "messages"
    }

    async fn load_entries(&self) -> Result<Vec<Value>> {
        self.entries
            .clone()
            .ok_or_else(|| PipelineError::source_data("messages", "dataset not bundled"))
    }
}

#[derive(Default)]
pub struct MemoryCursors {
    offsets: Mutex<HashMap<String, usize>>,
}

#[async_trait]
impl ImportCursorRepository for MemoryCursors {
    async fn load(&self, key: &str) -> Result<usize> {
        Ok(self.offsets.lock().unwrap().get(key).copied().unwrap_or(0))
    }

    async fn store(&self, key: &str, offset: usize) -> Result<()> {
        self.offsets.lock().unwrap().insert(key.to_string(), offset);
        Ok(())
    }
}

/// In-memory store with failure injection, call counters and an optional
/// gate that holds `fetch_page` until released.
pub struct FlakyRepository {
    inner: FileMessageRepository,
    fail_writes: AtomicBool,
    fail_fetches: AtomicBool,
    write_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    gated: AtomicBool,
    gate: Semaphore,
}

impl Default for FlakyRepository {
    fn default() -> Self {
        Self {
            inner: FileMessageRepository::in_memory(),
            fail_writes: AtomicBool::new(false),
            fail_fetches: AtomicBool::new(false),
            write_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }
}

impl FlakyRepository {
    pub fn gated() -> Self {
        let repository = Self::default();
        repository.gated.store(true, Ordering::SeqCst);
        repository
    }

    pub fn open_gate(&self) {
        self.gate.add_permits(1);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageRepository for FlakyRepository {
    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<Message>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.gated.load(Ordering::SeqCst) {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| PipelineError::internal(e.to_string()))?;
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(PipelineError::store("injected fetch failure"));
        }
        self.inner.fetch_page(page).await
    }

    async fn write_batch(&self, messages: &[Message]) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PipelineError::store("injected write failure"));
        }
        self.inner.write_batch(messages).await
    }

    async fn existing_ids(&self, candidates: &[String]) -> Result<HashSet<String>> {
        self.inner.existing_ids(candidates).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}
