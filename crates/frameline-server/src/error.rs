use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use frameline_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The path parameter is not a well-formed content hash. Treated the
    /// same as an unknown hash: 404.
    #[error("unknown photo hash: {0}")]
    UnknownHash(String),

    /// The upload request is not a usable multipart `photo` field.
    #[error("malformed upload: {0}")]
    MalformedUpload(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::UnknownHash(_) | ServerError::Store(StoreError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ServerError::MalformedUpload(_)
            | ServerError::Store(StoreError::InvalidFilename(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
