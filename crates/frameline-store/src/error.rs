use std::io;
use std::path::PathBuf;

use frameline_types::ContentHash;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store directory could not be created or scanned at startup.
    /// Fatal: a single unreadable file aborts initialization rather than
    /// leaving a partial index.
    #[error("failed to initialize store at {path}: {source}")]
    Init { path: PathBuf, source: io::Error },

    /// The requested hash is not in the index.
    #[error("photo not found: {0}")]
    NotFound(ContentHash),

    /// The upload filename is empty or not a plain file name.
    #[error("invalid upload filename: {0:?}")]
    InvalidFilename(String),

    /// An upload could not be written or renamed into place.
    #[error("failed to write {filename}: {source}")]
    Write { filename: String, source: io::Error },

    /// The backing file for a hash could not be removed. The index entry is
    /// retained in this case.
    #[error("failed to delete {hash}: {source}")]
    Delete { hash: ContentHash, source: io::Error },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
