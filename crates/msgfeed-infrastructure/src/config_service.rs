//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` (by default
//! `~/.config/msgfeed/config.toml`).

use msgfeed_core::config::FeedConfig;
use msgfeed_core::error::{PipelineError, Result};
use std::path::PathBuf;

use crate::paths::FeedPaths;
use crate::storage::AtomicFile;

/// Loads and validates [`FeedConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses an explicit config file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses the config file resolved by `paths`.
    pub fn from_paths(paths: &FeedPaths) -> Result<Self> {
        Ok(Self::new(paths.config_file()?))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the configuration. A missing or empty file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be parsed or holds
    /// invalid values.
    pub fn load(&self) -> Result<FeedConfig> {
        let file = AtomicFile::<FeedConfig>::toml(self.path.clone());
        let config = match file.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No config file, using defaults");
                FeedConfig::default()
            }
            Err(e) => {
                return Err(PipelineError::config(format!(
                    "Failed to load {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Writes `config` back to the file (used to seed a default config).
    pub fn save(&self, config: &FeedConfig) -> Result<()> {
        config.validate()?;
        AtomicFile::<FeedConfig>::toml(self.path.clone()).save(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::from_paths(&FeedPaths::new(Some(temp_dir.path()))).unwrap();

        assert_eq!(service.load().unwrap(), FeedConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        let config = FeedConfig {
            source_name: "archive".to_string(),
            chunk_size: 50,
            ..FeedConfig::default()
        };

        service.save(&config).unwrap();

        assert_eq!(service.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "chunk_size = 0").unwrap();

        let err = ConfigService::new(path.clone()).load().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        std::fs::write(&path, "chunk_size = \"many\"").unwrap();
        let err = ConfigService::new(path).load().unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
