//! Message repository trait.
//!
//! Defines the interface for message persistence operations.

use async_trait::async_trait;
use std::collections::HashSet;

use super::model::Message;
use super::page::PageRequest;
use crate::error::Result;

/// An abstract store for chat messages.
///
/// Decouples the importer and the pagination controller from the concrete
/// storage mechanism (JSON file, in-memory, database).
///
/// # Implementation Notes
///
/// Implementations must guarantee:
/// - at most one record per `id` (a repeated write replaces, never duplicates)
/// - batch writes are all-or-nothing
/// - `existing_ids` observes every write that returned `Ok` before it
/// - no retries; failures surface as `PipelineError::Store`
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Fetches one page of messages.
    ///
    /// Messages are selected newest-first (descending timestamp, later
    /// insertion wins ties), skipping `page.offset` and taking up to
    /// `page.limit`, and the selected page is returned oldest-first.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Message>)`: at most `page.limit` messages; fewer means end of data
    /// - `Err(_)`: persistence failure
    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<Message>>;

    /// Writes zero or more messages as one unit.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: every message committed
    /// - `Err(DataIntegrity)`: a message carries an unparseable timestamp; nothing committed
    /// - `Err(Store)`: persistence failure; nothing committed
    async fn write_batch(&self, messages: &[Message]) -> Result<()>;

    /// Writes a single message with the same contract as [`write_batch`](Self::write_batch).
    async fn write_one(&self, message: &Message) -> Result<()> {
        self.write_batch(std::slice::from_ref(message)).await
    }

    /// Returns the subset of `candidates` already present in the store.
    async fn existing_ids(&self, candidates: &[String]) -> Result<HashSet<String>>;

    /// Number of stored messages.
    async fn count(&self) -> Result<usize>;
}
