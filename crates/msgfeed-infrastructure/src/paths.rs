//! Unified path management for msgfeed files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/msgfeed/           # Config directory
//! └── config.toml              # FeedConfig
//!
//! ~/.local/share/msgfeed/      # Data directory
//! ├── messages.json            # Message store
//! ├── import_state.toml        # Import cursors
//! └── sources/                 # Source datasets (<name>.json)
//! ```
//!
//! A base directory override replaces both roots, which keeps tests inside
//! a temp dir.

use msgfeed_core::PipelineError;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "msgfeed";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config/data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PipelineError {
    fn from(e: PathError) -> Self {
        PipelineError::config(e.to_string())
    }
}

/// Path resolver for msgfeed.
#[derive(Debug, Clone, Default)]
pub struct FeedPaths {
    base_dir: Option<PathBuf>,
}

impl FeedPaths {
    /// Creates a resolver. `Some(base)` roots every path under `base`.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the msgfeed configuration directory (e.g. `~/.config/msgfeed/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the msgfeed data directory (e.g. `~/.local/share/msgfeed/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("messages.json"))
    }

    pub fn import_state_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("import_state.toml"))
    }

    pub fn sources_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("sources"))
    }
}
