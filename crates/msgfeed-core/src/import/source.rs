//! Source dataset types.
//!
//! A source is a named, static array of loosely typed objects. Entries are
//! kept raw until the importer looks at them so one bad entry never spoils
//! the rest of the dataset.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::message::{Message, parse_timestamp};

/// A static dataset the importer reads messages from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Dataset name; also keys the import cursor.
    fn name(&self) -> &str;

    /// Loads every raw entry of the dataset.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Value>)`: all entries, in dataset order
    /// - `Err(SourceData)`: dataset absent or not an array
    async fn load_entries(&self) -> Result<Vec<Value>>;
}

/// Wire shape of one source entry. Every field is optional on the wire;
/// an entry only becomes a [`Message`] when all of them are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub id: Option<String>,
    pub text: Option<String>,
    pub is_sender: Option<bool>,
    pub timestamp: Option<String>,
    pub author: Option<String>,
}

impl SourceEntry {
    /// Parses a raw dataset value. Returns `None` for non-objects and for
    /// fields of the wrong type.
    pub fn from_value(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        Self::deserialize(raw).ok()
    }

    /// Converts into a message if every field is present and the timestamp parses.
    pub fn into_message(self) -> Option<Message> {
        let timestamp = self.timestamp?;
        parse_timestamp(&timestamp).ok()?;
        Some(Message {
            id: self.id?,
            text: self.text?,
            is_sender: self.is_sender?,
            timestamp,
            author: self.author?,
        })
    }
}

/// Parses one raw entry straight into a message, if it is well-formed.
pub fn parse_entry(raw: &Value) -> Option<Message> {
    SourceEntry::from_value(raw)?.into_message()
}
