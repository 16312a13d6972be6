//! Infrastructure layer for msgfeed: file-backed implementations of the
//! core repository traits, configuration loading and path resolution.

pub mod config_service;
pub mod file_message_repository;
pub mod json_file_source;
pub mod paths;
pub mod storage;
pub mod toml_import_cursor_repository;

pub use crate::config_service::ConfigService;
pub use crate::file_message_repository::FileMessageRepository;
pub use crate::json_file_source::JsonFileSource;
pub use crate::paths::FeedPaths;
pub use crate::toml_import_cursor_repository::TomlImportCursorRepository;
