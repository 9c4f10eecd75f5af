use thiserror::Error;

/// Errors from synchronization operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote could not be reached (network failure or timeout).
    /// Grows the retry backoff; recovered on the next scheduled cycle.
    #[error("connection to remote failed: {0}")]
    Connection(String),

    /// The remote inventory payload could not be decoded. Aborts the cycle
    /// without touching the backoff.
    #[error("malformed remote inventory: {0}")]
    Decode(String),

    /// The remote answered with an error status for a single item.
    #[error("remote error: {0}")]
    Remote(String),

    /// A sync cycle is already in flight; callers are rejected, not queued.
    #[error("sync already in progress")]
    AlreadyInProgress,

    /// Local filesystem failure while scanning or writing the photo
    /// directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
