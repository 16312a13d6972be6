//! Import results.

use std::ops::Range;

/// What a single `import_next_chunk` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A window was processed and the cursor advanced past it.
    Imported(ChunkReport),
    /// The cursor already sits at the end of the source; nothing to do.
    Complete,
}

impl ImportOutcome {
    /// Number of messages written by this call.
    pub fn written(&self) -> usize {
        match self {
            Self::Imported(report) => report.written,
            Self::Complete => 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Per-window import statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Source indices covered by the window.
    pub window: Range<usize>,
    /// Messages written to the store.
    pub written: usize,
    /// Entries skipped because a field was missing or malformed.
    pub malformed: usize,
    /// Entries superseded by a later entry with the same id in the window.
    pub duplicates: usize,
    /// Messages dropped because the store already held their id.
    pub already_stored: usize,
}

impl ChunkReport {
    pub fn new(window: Range<usize>) -> Self {
        Self {
            window,
            written: 0,
            malformed: 0,
            duplicates: 0,
            already_stored: 0,
        }
    }
}
