//! Import domain module.
//!
//! - `source`: the `MessageSource` trait and raw entry parsing
//! - `cursor`: the `ImportCursorRepository` trait for durable progress
//! - `report`: `ImportOutcome` / `ChunkReport`

mod cursor;
mod report;
mod source;

pub use cursor::{ImportCursorRepository, cursor_key};
pub use report::{ChunkReport, ImportOutcome};
pub use source::{MessageSource, SourceEntry, parse_entry};
