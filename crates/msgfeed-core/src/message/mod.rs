//! Message domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Message` record and timestamp helpers
//! - `page`: `PageRequest` bounds for paginated reads
//! - `repository`: `MessageRepository` trait for persistence

mod model;
mod page;
mod repository;

pub use model::{Message, format_timestamp, parse_timestamp};
pub use page::PageRequest;
pub use repository::MessageRepository;
