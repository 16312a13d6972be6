//! Paginated message feed.
//!
//! `PaginationController` is the single entry point a presentation layer
//! talks to: it couples "import the next source chunk" with "read the next
//! page" and keeps an ascending view of everything loaded so far.

use msgfeed_core::config::DEFAULT_PAGE_SIZE;
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::message::{Message, MessageRepository, PageRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, watch};

use crate::chunk_importer::ChunkImporter;
use crate::feed_view::FeedView;

/// Result of a page load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// Another load was running; this request was dropped.
    InFlight,
    /// The page was fetched. `fetched` counts records returned by the store,
    /// `added` the ones that were new to the view.
    Loaded { fetched: usize, added: usize },
}

#[derive(Debug, Default)]
struct FeedState {
    view: FeedView,
    /// Records obtained through `fetch_page` in this session.
    current_offset: usize,
}

/// Releases the in-flight flag on every exit path.
struct LoadGuard<'a>(&'a AtomicBool);

impl<'a> LoadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Import-then-fetch pagination over the message store.
///
/// All methods take `&self`; share the controller behind an `Arc`. Only
/// one page load runs at a time: a second `load_next_page` issued while
/// one is running returns [`PageLoad::InFlight`] immediately rather than
/// queueing.
pub struct PaginationController {
    repository: Arc<dyn MessageRepository>,
    importer: ChunkImporter,
    page_size: usize,
    loading: AtomicBool,
    state: RwLock<FeedState>,
    updates: watch::Sender<Vec<Message>>,
}

impl PaginationController {
    /// Creates a controller with the default page size.
    pub fn new(repository: Arc<dyn MessageRepository>, importer: ChunkImporter) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            repository,
            importer,
            page_size: DEFAULT_PAGE_SIZE,
            loading: AtomicBool::new(false),
            state: RwLock::new(FeedState::default()),
            updates,
        }
    }

    /// Sets the number of messages fetched per page.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero page size.
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(PipelineError::invalid_argument("page_size must be positive"));
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn importer(&self) -> &ChunkImporter {
        &self.importer
    }

    /// Subscribes to the ascending view. A new value is published after
    /// every successful change to the view.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.updates.subscribe()
    }

    /// Starts a fresh session: rewinds the import cursor, clears the view
    /// and the read offset, then loads the first page.
    ///
    /// Returns [`PageLoad::InFlight`] without touching anything if a load is
    /// already running.
    pub async fn load_messages(&self) -> Result<PageLoad> {
        let Some(_guard) = LoadGuard::acquire(&self.loading) else {
            tracing::debug!("Page load already in flight; fresh start skipped");
            return Ok(PageLoad::InFlight);
        };

        self.importer.reset_import().await?;
        {
            let mut state = self.state.write().await;
            state.view.clear();
            state.current_offset = 0;
            self.publish(&state);
        }

        self.load_page().await
    }

    /// Imports the next source chunk, then fetches the next page of older
    /// messages and prepends it to the view.
    ///
    /// A failed load leaves the view and the read offset unchanged.
    pub async fn load_next_page(&self) -> Result<PageLoad> {
        let Some(_guard) = LoadGuard::acquire(&self.loading) else {
            tracing::debug!("Page load already in flight; request dropped");
            return Ok(PageLoad::InFlight);
        };

        self.load_page().await
    }

    async fn load_page(&self) -> Result<PageLoad> {
        match self.importer.import_next_chunk().await {
            Ok(outcome) => {
                tracing::debug!(written = outcome.written(), "Import step finished");
            }
            Err(e) if e.is_source_data() => {
                tracing::warn!(error = %e, "Source unavailable; serving stored messages only");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Import failed; page not loaded");
                return Err(e);
            }
        }

        let offset = self.state.read().await.current_offset;
        let page = self
            .repository
            .fetch_page(PageRequest::new(self.page_size, offset))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, offset, "Failed to fetch page"))?;

        let fetched = page.len();
        let mut state = self.state.write().await;
        state.current_offset += fetched;
        let added = state.view.prepend_page(page);
        if added > 0 {
            self.publish(&state);
        }

        tracing::debug!(
            fetched,
            added,
            offset = state.current_offset,
            total = state.view.len(),
            "Loaded page"
        );
        Ok(PageLoad::Loaded { fetched, added })
    }

    /// Creates and stores a new message, then appends it to the view.
    ///
    /// The message only becomes visible once the write succeeded. The read
    /// offset is not affected.
    pub async fn add_message(
        &self,
        text: impl Into<String>,
        is_sender: bool,
        author: impl Into<String>,
    ) -> Result<Message> {
        let message = Message::compose(text, is_sender, author);

        self.repository
            .write_one(&message)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to save new message"))?;

        let mut state = self.state.write().await;
        if state.view.append(message.clone()) {
            self.publish(&state);
        }
        tracing::debug!(id = %message.id, "Added message");
        Ok(message)
    }

    /// Number of messages in the view.
    pub async fn count(&self) -> usize {
        self.state.read().await.view.len()
    }

    /// Message at `index` (0 = oldest loaded).
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` past the end of the view.
    pub async fn record_at(&self, index: usize) -> Result<Message> {
        self.state.read().await.view.get(index).cloned()
    }

    /// Copy of the whole ascending view.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.state.read().await.view.messages().to_vec()
    }

    /// Records fetched from the store so far in this session.
    pub async fn current_offset(&self) -> usize {
        self.state.read().await.current_offset
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn publish(&self, state: &FeedState) {
        self.updates.send_replace(state.view.messages().to_vec());
    }
}
