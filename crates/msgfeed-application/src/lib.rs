//! Application layer for msgfeed.
//!
//! Coordinates the core repository traits into the two use cases the
//! presentation layer relies on: windowed source import and paginated
//! reading with live append.

pub mod chunk_importer;
pub mod feed_view;
pub mod pagination;

#[cfg(test)]
mod test_support;

pub use chunk_importer::ChunkImporter;
pub use feed_view::FeedView;
pub use pagination::{PageLoad, PaginationController};
