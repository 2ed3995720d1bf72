//! Error types for loopkit-state

use std::time::Duration;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No flush notified the awaiting caller within the configured window
    ///
    /// The patch itself is not lost: it stays queued and is applied by
    /// whatever flush eventually runs. Callers that want fire-and-forget
    /// semantics can simply ignore this error.
    #[error("no state flush occurred within {waited:?}")]
    FlushTimeout {
        /// How long the caller waited for a flush
        waited: Duration,
    },

    /// The store was disposed before the awaited flush could run
    #[error("store has been disposed")]
    Disposed,
}
