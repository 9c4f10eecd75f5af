//! HTTP surface for the Frameline content store.
//!
//! A thin transport over [`frameline_store::ContentStore`]: every route
//! maps one-to-one onto a store operation and carries no business logic:
//!
//! - `GET /photos/list` → `list()`
//! - `GET /photos/{hash}` → `get()` + file body
//! - `POST /photos/{ignored}` (multipart field `photo`) → `add()`
//! - `DELETE /photos/{hash}` → `delete()`

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::PhotoServer;
