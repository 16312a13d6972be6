//! Page request bounds.

use crate::error::{PipelineError, Result};

/// Bounds of one page read: up to `limit` messages, skipping the `offset`
/// most recent ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Builds a request from signed bounds, as handed over by callers that
    /// do arithmetic in signed integers (CLI flags, UI index math).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either bound is negative.
    pub fn checked(limit: i64, offset: i64) -> Result<Self> {
        let limit = usize::try_from(limit)
            .map_err(|_| PipelineError::invalid_argument(format!("limit must be >= 0, got {}", limit)))?;
        let offset = usize::try_from(offset).map_err(|_| {
            PipelineError::invalid_argument(format!("offset must be >= 0, got {}", offset))
        })?;
        Ok(Self { limit, offset })
    }
}
