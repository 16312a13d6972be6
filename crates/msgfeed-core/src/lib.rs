//! Domain layer for msgfeed.
//!
//! Holds the message record, the repository traits the pipeline is built
//! against, configuration, and the shared error type. No I/O lives here.

pub mod config;
pub mod error;
pub mod import;
pub mod message;

// Re-export common error type
pub use error::{PipelineError, Result};
