//! Error types for the msgfeed pipeline.

use thiserror::Error;

/// A shared error type for the whole pipeline.
///
/// Store failures travel through the importer and the pagination controller
/// unchanged, so callers can match on the variant no matter which layer
/// raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Malformed caller input (negative page bounds, zero sizes).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source dataset missing or unparseable.
    #[error("Source data error: {source_name} - {message}")]
    SourceData {
        source_name: String,
        message: String,
    },

    /// Underlying persistence failure on read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// A record that cannot be persisted faithfully (e.g. unparseable timestamp).
    #[error("Data integrity error: record '{id}' - {message}")]
    DataIntegrity { id: String, message: String },

    /// Accessor index beyond the current view.
    #[error("Index {index} out of range (view holds {len} messages)")]
    OutOfRange { index: usize, len: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a SourceData error for the named dataset
    pub fn source_data(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceData {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Creates a DataIntegrity error for a record
    pub fn data_integrity(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Source failures are recoverable: the import step is skipped, the
    /// rest of the pipeline keeps serving stored data.
    pub fn is_source_data(&self) -> bool {
        matches!(self, Self::SourceData { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::DataIntegrity { .. })
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PipelineError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
