//! Display-ordered, id-deduplicated message list.

use chrono::{DateTime, Utc};
use msgfeed_core::error::{PipelineError, Result};
use msgfeed_core::message::{Message, parse_timestamp};
use std::collections::HashSet;

/// Ascending (oldest-first) view over loaded messages.
///
/// Older pages are prepended and live messages appended. Both paths keep
/// the list sorted by timestamp and free of repeated ids; when a prepended
/// page or an appended message does not fit at the boundary, the list is
/// re-sorted stably instead of trusting the caller.
#[derive(Debug, Default, Clone)]
pub struct FeedView {
    messages: Vec<Message>,
    ids: HashSet<String>,
}

impl FeedView {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Message> {
        self.messages.get(index).ok_or(PipelineError::OutOfRange {
            index,
            len: self.messages.len(),
        })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }

    /// Prepends an ascending page. Messages already in the view are dropped.
    ///
    /// Returns how many messages were added.
    pub fn prepend_page(&mut self, page: Vec<Message>) -> usize {
        let fresh: Vec<Message> = page
            .into_iter()
            .filter(|message| self.ids.insert(message.id.clone()))
            .collect();
        let added = fresh.len();
        if added == 0 {
            return 0;
        }

        let fits = match (fresh.last(), self.messages.first()) {
            (Some(last), Some(first)) => sort_key(last) <= sort_key(first),
            _ => true,
        };
        self.messages.splice(0..0, fresh);
        if !fits || !is_ascending(&self.messages[..added]) {
            self.resort();
        }
        added
    }

    /// Appends a message. Returns `false` if its id is already present.
    pub fn append(&mut self, message: Message) -> bool {
        if !self.ids.insert(message.id.clone()) {
            return false;
        }
        let key = sort_key(&message);
        match self.messages.last() {
            Some(last) if sort_key(last) > key => {
                // Upper bound keeps equal timestamps in arrival order.
                let at = self.messages.partition_point(|m| sort_key(m) <= key);
                self.messages.insert(at, message);
            }
            _ => self.messages.push(message),
        }
        true
    }

    fn resort(&mut self) {
        self.messages.sort_by_cached_key(sort_key);
    }
}

/// Stored messages always carry parseable timestamps; anything else sorts first.
fn sort_key(message: &Message) -> Option<DateTime<Utc>> {
    parse_timestamp(&message.timestamp).ok()
}

fn is_ascending(messages: &[Message]) -> bool {
    messages
        .windows(2)
        .all(|pair| sort_key(&pair[0]) <= sort_key(&pair[1]))
}
