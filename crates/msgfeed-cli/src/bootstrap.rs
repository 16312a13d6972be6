//! Wires the file-backed infrastructure into a pagination controller.

use anyhow::{Context, Result};
use msgfeed_application::{ChunkImporter, PaginationController};
use msgfeed_core::config::FeedConfig;
use msgfeed_infrastructure::{
    ConfigService, FeedPaths, FileMessageRepository, JsonFileSource, TomlImportCursorRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::GlobalOptions;

/// Everything a command needs.
pub struct Feed {
    pub config: FeedConfig,
    pub repository: Arc<FileMessageRepository>,
    pub controller: PaginationController,
}

/// Resolves configuration and paths, then constructs the store, the
/// importer and the controller.
pub async fn bootstrap(options: &GlobalOptions) -> Result<Feed> {
    let config = resolve_config(options)?;

    let data_dir = options.data_dir.clone().or_else(|| config.data_dir.clone());
    let paths = FeedPaths::new(data_dir.as_deref());
    let source_dir = match &config.source_dir {
        Some(dir) => dir.clone(),
        None => paths.sources_dir()?,
    };

    let store_file = paths.store_file()?;
    let repository = Arc::new(
        FileMessageRepository::open(store_file.clone())
            .await
            .with_context(|| format!("Failed to open message store {}", store_file.display()))?,
    );
    let source = Arc::new(JsonFileSource::new(config.source_name.clone(), &source_dir));
    let cursors = Arc::new(TomlImportCursorRepository::new(paths.import_state_file()?));

    let importer =
        ChunkImporter::new(source, repository.clone(), cursors).with_chunk_size(config.chunk_size)?;
    let controller =
        PaginationController::new(repository.clone(), importer).with_page_size(config.page_size)?;

    tracing::debug!(
        source = %config.source_name,
        source_dir = %source_dir.display(),
        store = %store_file.display(),
        "Feed ready"
    );

    Ok(Feed {
        config,
        repository,
        controller,
    })
}

fn resolve_config(options: &GlobalOptions) -> Result<FeedConfig> {
    let config_path: PathBuf = match &options.config {
        Some(path) => path.clone(),
        None => FeedPaths::new(None).config_file()?,
    };
    let mut config = ConfigService::new(config_path).load()?;
    if let Some(source) = &options.source {
        config.source_name = source.clone();
        config.validate()?;
    }
    Ok(config)
}
