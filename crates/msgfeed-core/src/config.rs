use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{PipelineError, Result};

pub const DEFAULT_SOURCE_NAME: &str = "messages";
pub const DEFAULT_CHUNK_SIZE: usize = 20;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Root configuration (`config.toml`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Name of the source dataset (`<source_dir>/<source_name>.json`).
    #[serde(default = "default_source_name")]
    pub source_name: String,
    /// Directory holding source datasets. Defaults to `<data_dir>/sources`.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    /// Directory for the message store and import state.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Source entries processed per import step.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Messages fetched per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_source_name() -> String {
    DEFAULT_SOURCE_NAME.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            source_dir: None,
            data_dir: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FeedConfig {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.source_name.trim().is_empty() {
            return Err(PipelineError::config("source_name must not be empty"));
        }
        if self.chunk_size == 0 {
            return Err(PipelineError::config("chunk_size must be positive"));
        }
        if self.page_size == 0 {
            return Err(PipelineError::config("page_size must be positive"));
        }
        Ok(())
    }
}
