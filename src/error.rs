use thiserror::Error;

/// Errors reported while constructing a median queue.
///
/// Every failure happens at construction time; once a queue exists, updates
/// and queries can not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MedianQueueError {
    /// The window was requested with a period of zero
    #[error("period can not be zero")]
    ZeroPeriod,
    /// The number of initial values does not match the requested period
    #[error("expected {expected} initial values, got {actual}")]
    LengthMismatch {
        /// The requested period
        expected: usize,
        /// The number of values supplied
        actual: usize,
    },
    /// Storage for the window could not be reserved
    #[error("failed to allocate storage for a window of {0} values")]
    Allocation(usize),
}

/// Result alias used by every fallible constructor in this crate
pub type Result<T> = core::result::Result<T, MedianQueueError>;
