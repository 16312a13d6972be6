//! Message record types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// A single chat message.
///
/// Identity is defined by `id` alone: two messages with the same id are
/// equal even when their text or timestamp differ, so collections keyed on
/// `Message` deduplicate the way the store does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Opaque unique key.
    pub id: String,
    /// Plain-text content. May be empty.
    pub text: String,
    /// `true` when the local user wrote the message.
    pub is_sender: bool,
    /// Creation time (RFC 3339 with sub-second precision). Sole sort key.
    pub timestamp: String,
    /// Display name of the originating party. May be empty.
    pub author: String,
}

impl Message {
    /// Composes a new message stamped with a fresh UUID and the current time.
    pub fn compose(text: impl Into<String>, is_sender: bool, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_sender,
            timestamp: format_timestamp(Utc::now()),
            author: author.into(),
        }
    }

    /// Parses `timestamp`, mapping failure to a data integrity error for this record.
    pub fn parsed_timestamp(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.timestamp).map_err(|e| {
            PipelineError::data_integrity(
                &self.id,
                format!("unparseable timestamp '{}': {}", self.timestamp, e),
            )
        })
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp the way newly composed messages carry it
/// (`2025-08-04T09:30:00.123Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn message(id: &str, text: &str) -> Message {
        Message {
            id: id.to_string(),
            text: text.to_string(),
            is_sender: false,
            timestamp: "2025-08-01T10:00:00.000Z".to_string(),
            author: "Anna".to_string(),
        }
    }

    #[test]
    fn test_identity_is_id_only() {
        let a = message("m1", "hello");
        let b = message("m1", "edited");
        assert_eq!(a, b);

        let set: HashSet<Message> = [a, b, message("m2", "other")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_compose_produces_parseable_timestamp() {
        let composed = Message::compose("hi", true, "ME");
        assert!(!composed.id.is_empty());
        assert_eq!(composed.text, "hi");
        assert!(composed.is_sender);
        assert!(composed.parsed_timestamp().is_ok());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let raw = "2025-08-04T09:30:00.123Z";
        let parsed = parse_timestamp(raw).unwrap();
        assert_eq!(format_timestamp(parsed), raw);
        assert_eq!(parse_timestamp(&format_timestamp(parsed)).unwrap(), parsed);
    }

    #[test]
    fn test_offset_timestamps_normalize_to_utc() {
        let a = parse_timestamp("2025-08-04T11:30:00+02:00").unwrap();
        let b = parse_timestamp("2025-08-04T09:30:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unparseable_timestamp_is_data_integrity_error() {
        let mut bad = message("m9", "broken");
        bad.timestamp = "yesterday".to_string();
        let err = bad.parsed_timestamp().unwrap_err();
        assert!(err.is_data_integrity());
        assert!(err.to_string().contains("m9"));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(message("m1", "hello")).unwrap();
        assert_eq!(json["isSender"], serde_json::Value::Bool(false));
        assert!(json.get("is_sender").is_none());
    }
}
