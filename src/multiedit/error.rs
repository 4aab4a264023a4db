//! Error taxonomy for multi-edit operations

use thiserror::Error;

/// Every failure a multi-edit operation can report.
///
/// All errors are local to the operation that raised them: on `Err` the
/// region set, outer bounds, cursor and history are left as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiEditError {
    /// Nothing under point (or in the selection) can seed a pattern
    #[error("Nothing to match at point")]
    NoMatchable,

    /// The requested scope unit does not exist at point
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Incremental discovery found no further unclaimed match in scope
    #[error("No more matches")]
    NoMoreMatches,

    /// Navigation found no region beyond the cursor in that direction
    #[error("No more occurrences")]
    NoMoreOccurrences,

    /// A tracked span could not be created (out of bounds or overlapping)
    #[error("Failed to create region at {start}..{end}")]
    FailedRegionCreation { start: usize, end: usize },

    /// An ex-style regexp did not compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Restore was requested but no usable history exists
    #[error("No previous multi-edit session to restore")]
    NoHistory,

    /// The operation needs a live session
    #[error("No active multi-edit session")]
    Inactive,
}

impl MultiEditError {
    /// Exhaustion conditions: shown to the user, nothing changed, session continues
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoMoreMatches | Self::NoMoreOccurrences)
    }
}
