use thiserror::Error;

/// Errors from gallery operations.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A photo file could not be decoded.
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure while enumerating or reading photos.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The filesystem watch subscription could not be established.
    #[error("watch subscription failed: {0}")]
    Watch(#[from] notify::Error),

    /// A background decode task was cancelled or panicked.
    #[error("load task failed: {0}")]
    LoadTask(String),
}

/// Result alias for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;
